use crate::{Archive, Content, ContentFilter, ViewMode};

/// Every request the overview accepts. Each command is applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverviewCommand {
    /// User dropped or picked archives (absolute paths).
    UploadArchives(Vec<String>),
    /// Ingestion finished for a tracked archive.
    ArchiveIngested(Archive),
    /// Flip Collapsed/Expanded for the archive at this path.
    ToggleArchiveExpansion(String),
    AddToSelection(Vec<Content>),
    RemoveFromSelection(Vec<Content>),
    ClearSelection,
    AddContentFilter(ContentFilter),
    RemoveContentFilter(ContentFilter),
    /// Inclusive epoch-millis bounds; `None` leaves that side open.
    SetDateRange {
        start: Option<i64>,
        end: Option<i64>,
    },
    SetViewMode(ViewMode),
    SaveContent(Content),
    /// Export the processed archive at this path as a whole.
    SaveArchive(String),
    SaveContents(Vec<Content>),
    /// User chose a destination for the pending save candidate.
    SaveConfirmation { path: String, name: String },
    SaveCancellation,
    /// An export started by `SaveConfirmation` finished.
    ExportFinished(Result<String, String>),
    /// Remove the archive at this path and everything selected from it.
    RemoveArchive(String),
    UpdateHovering(bool),
}
