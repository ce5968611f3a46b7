use std::collections::BTreeSet;

use crate::{Archive, Content, ContentFilter, OverviewState};

/// Inclusive date-range test. A content without `last_modified` fails as soon
/// as either bound is set; an inverted range matches nothing.
pub fn passes_date_range(content: &Content, start: Option<i64>, end: Option<i64>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(t) = content.last_modified() else {
        return false;
    };
    start.is_none_or(|start| t >= start) && end.is_none_or(|end| t <= end)
}

/// An empty filter set lets everything through.
pub fn passes_filters(content: &Content, filters: &BTreeSet<ContentFilter>) -> bool {
    filters.is_empty() || filters.iter().any(|filter| filter.matches(content))
}

/// Contents of the archive at `archive_path` visible under the current
/// filters and date range, in archive order.
pub fn filtered_contents<'a>(state: &'a OverviewState, archive_path: &str) -> Vec<&'a Content> {
    let Some(overview_archive) = state.overview_archive(archive_path) else {
        return Vec::new();
    };
    let (start, end) = state.date_range();
    overview_archive
        .archive
        .contents()
        .iter()
        .filter(|content| passes_filters(content, state.content_filters()))
        .filter(|content| passes_date_range(content, start, end))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStatus {
    Processing,
    Processed,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRowView {
    pub path: String,
    pub name: String,
    pub status: ArchiveStatus,
    pub failure: Option<String>,
    pub expanded: bool,
    pub total_contents: usize,
    pub visible_contents: usize,
    pub selected_contents: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewViewModel {
    pub archives: Vec<ArchiveRowView>,
    pub selection_count: usize,
    pub has_save_candidate: bool,
    pub is_processing: bool,
}

impl OverviewState {
    pub fn view(&self) -> OverviewViewModel {
        let archives = self
            .overview_archives()
            .iter()
            .map(|overview_archive| {
                let archive = &overview_archive.archive;
                let (status, failure) = match archive {
                    Archive::Processing { .. } => (ArchiveStatus::Processing, None),
                    Archive::Processed { .. } => (ArchiveStatus::Processed, None),
                    Archive::Failure { cause, .. } => (ArchiveStatus::Failure, Some(cause.clone())),
                };
                ArchiveRowView {
                    path: archive.path().to_string(),
                    name: archive.name().to_string(),
                    status,
                    failure,
                    expanded: overview_archive.is_expanded(),
                    total_contents: archive.contents().len(),
                    visible_contents: filtered_contents(self, archive.path()).len(),
                    selected_contents: archive
                        .contents()
                        .iter()
                        .filter(|content| self.is_selected(content))
                        .count(),
                }
            })
            .collect();

        OverviewViewModel {
            archives,
            selection_count: self.selection().map_or(0, |selection| selection.len()),
            has_save_candidate: self.save_candidate().is_some(),
            is_processing: self.is_processing_any(),
        }
    }
}
