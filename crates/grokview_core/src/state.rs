use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{Archive, Content, ContentFilter, ContentKey, OverviewArchive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// A pending export awaiting the user's destination choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SaveCandidate {
    Archive(Archive),
    Content(Content),
    Contents(Vec<Content>),
}

impl SaveCandidate {
    /// Whether the candidate reads from the archive at `path`.
    pub fn refers_to(&self, path: &str) -> bool {
        match self {
            SaveCandidate::Archive(archive) => archive.path() == path,
            SaveCandidate::Content(content) => content.zip_file_path() == path,
            SaveCandidate::Contents(contents) => {
                contents.iter().any(|content| content.zip_file_path() == path)
            }
        }
    }
}

/// A non-empty multi-selection.
///
/// `contents` and `content_ids` always describe the same items: every key in
/// `content_ids` maps to exactly one entry of `contents`, and `content_ids`
/// keeps first-insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    contents: HashMap<ContentKey, Content>,
    content_ids: Vec<ContentKey>,
}

impl Selection {
    /// Builds a selection from `contents`, or `None` when nothing remains.
    pub(crate) fn from_contents<'a>(contents: impl IntoIterator<Item = &'a Content>) -> Option<Self> {
        let mut selection = Selection {
            contents: HashMap::new(),
            content_ids: Vec::new(),
        };
        selection.add(contents);
        (!selection.content_ids.is_empty()).then_some(selection)
    }

    pub fn contents(&self) -> &HashMap<ContentKey, Content> {
        &self.contents
    }

    pub fn content_ids(&self) -> &[ContentKey] {
        &self.content_ids
    }

    pub fn len(&self) -> usize {
        self.content_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content_ids.is_empty()
    }

    pub fn contains(&self, content: &Content) -> bool {
        self.contents
            .get(&content.key())
            .is_some_and(|selected| selected == content)
    }

    /// Selected contents in first-insertion order.
    pub fn ordered_contents(&self) -> Vec<Content> {
        self.content_ids
            .iter()
            .filter_map(|key| self.contents.get(key))
            .cloned()
            .collect()
    }

    pub(crate) fn add<'a>(&mut self, contents: impl IntoIterator<Item = &'a Content>) {
        for content in contents {
            let key = content.key();
            if let Entry::Vacant(slot) = self.contents.entry(key.clone()) {
                slot.insert(content.clone());
                self.content_ids.push(key);
            }
        }
    }

    pub(crate) fn remove_keys(&mut self, keys: &HashSet<ContentKey>) {
        let before = self.contents.len();
        for key in keys {
            self.contents.remove(key);
        }
        if self.contents.len() != before {
            self.content_ids.retain(|key| !keys.contains(key));
        }
    }

    /// Drops every selected item matching `predicate`.
    pub(crate) fn remove_where(&mut self, predicate: impl Fn(&Content) -> bool) {
        let before = self.contents.len();
        self.contents.retain(|_, content| !predicate(content));
        if self.contents.len() != before {
            let contents = &self.contents;
            self.content_ids.retain(|key| contents.contains_key(key));
        }
    }
}

/// Mutually exclusive modes of the overview.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverviewMode {
    #[default]
    Default,
    Selection(Selection),
}

/// Application state of the overview. Only [`crate::update`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverviewState {
    pub(crate) mode: OverviewMode,
    pub(crate) content_filters: BTreeSet<ContentFilter>,
    pub(crate) overview_archives: Vec<OverviewArchive>,
    pub(crate) last_directory_path: Option<String>,
    pub(crate) save_candidate: Option<SaveCandidate>,
    pub(crate) is_hovered: bool,
    pub(crate) date_range_start: Option<i64>,
    pub(crate) date_range_end: Option<i64>,
    pub(crate) view_mode: ViewMode,
}

impl OverviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &OverviewMode {
        &self.mode
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.mode {
            OverviewMode::Default => None,
            OverviewMode::Selection(selection) => Some(selection),
        }
    }

    pub fn is_selected(&self, content: &Content) -> bool {
        self.selection()
            .is_some_and(|selection| selection.contains(content))
    }

    pub fn content_filters(&self) -> &BTreeSet<ContentFilter> {
        &self.content_filters
    }

    pub fn overview_archives(&self) -> &[OverviewArchive] {
        &self.overview_archives
    }

    pub fn overview_archive(&self, path: &str) -> Option<&OverviewArchive> {
        self.overview_archives
            .iter()
            .find(|overview_archive| overview_archive.path() == path)
    }

    pub fn last_directory_path(&self) -> Option<&str> {
        self.last_directory_path.as_deref()
    }

    pub fn save_candidate(&self) -> Option<&SaveCandidate> {
        self.save_candidate.as_ref()
    }

    pub fn is_hovered(&self) -> bool {
        self.is_hovered
    }

    pub fn date_range(&self) -> (Option<i64>, Option<i64>) {
        (self.date_range_start, self.date_range_end)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// True while any archive is still being ingested.
    pub fn is_processing_any(&self) -> bool {
        self.overview_archives
            .iter()
            .any(|overview_archive| !overview_archive.archive.is_terminal())
    }

    pub(crate) fn tracks(&self, path: &str) -> bool {
        self.overview_archive(path).is_some()
    }

    pub(crate) fn overview_archive_mut(&mut self, path: &str) -> Option<&mut OverviewArchive> {
        self.overview_archives
            .iter_mut()
            .find(|overview_archive| overview_archive.path() == path)
    }

    /// Applies `f` to the selection and reverts to `Default` if it empties.
    pub(crate) fn edit_selection(&mut self, f: impl FnOnce(&mut Selection)) {
        if let OverviewMode::Selection(selection) = &mut self.mode {
            f(selection);
            if selection.is_empty() {
                self.mode = OverviewMode::Default;
            }
        }
    }
}
