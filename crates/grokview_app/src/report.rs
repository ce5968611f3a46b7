use std::fmt::Write;

use chrono::DateTime;
use grokview_core::{filtered_contents, Archive, Content, OverviewState};
use serde::Serialize;

/// What the CLI prints: each tracked archive with its visible contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalogue {
    pub archives: Vec<ArchiveReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    pub path: String,
    pub name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub total_contents: usize,
    pub contents: Vec<ContentReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentReport {
    pub id: String,
    pub path: String,
    pub mime_type: String,
    pub extension: String,
    pub size: i64,
    pub last_modified: Option<String>,
}

impl Catalogue {
    pub fn from_state(state: &OverviewState) -> Self {
        let archives = state
            .overview_archives()
            .iter()
            .map(|overview_archive| {
                let archive = &overview_archive.archive;
                let (status, failure) = match archive {
                    Archive::Processing { .. } => ("processing", None),
                    Archive::Processed { .. } => ("processed", None),
                    Archive::Failure { cause, .. } => ("failed", Some(cause.clone())),
                };
                ArchiveReport {
                    path: archive.path().to_string(),
                    name: archive.name().to_string(),
                    status,
                    failure,
                    total_contents: archive.contents().len(),
                    contents: filtered_contents(state, archive.path())
                        .into_iter()
                        .map(ContentReport::from)
                        .collect(),
                }
            })
            .collect();
        Self { archives }
    }

    pub fn visible_count(&self) -> usize {
        self.archives.iter().map(|archive| archive.contents.len()).sum()
    }

    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for archive in &self.archives {
            let _ = writeln!(
                out,
                "{} [{}] {} of {} contents",
                archive.name,
                archive.status,
                archive.contents.len(),
                archive.total_contents
            );
            if let Some(failure) = &archive.failure {
                let _ = writeln!(out, "  error: {failure}");
            }
            for content in &archive.contents {
                let _ = writeln!(
                    out,
                    "  {:<18} {:<26} {:>10}  {:<10}  {}",
                    content.id,
                    content.mime_type,
                    format_size(content.size),
                    content
                        .last_modified
                        .as_deref()
                        .and_then(|stamp| stamp.get(..10))
                        .unwrap_or("-"),
                    content.path
                );
            }
        }
        out
    }
}

impl From<&Content> for ContentReport {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id().to_string(),
            path: content.path().to_string(),
            mime_type: content.mime_type().to_string(),
            extension: content.extension().to_string(),
            size: content.size(),
            last_modified: content
                .last_modified()
                .and_then(DateTime::from_timestamp_millis)
                .map(|utc| utc.to_rfc3339()),
        }
    }
}

/// Human-readable byte count; unreadable entries (negative size) show as `?`.
pub fn format_size(size: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    if size < 0 {
        return "?".to_string();
    }
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{size} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
