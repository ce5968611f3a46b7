//! GrokView core: domain types, the pure overview reducer and query helpers.
mod archive;
mod content;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use archive::{archive_name, Archive, Expansion, OverviewArchive};
pub use content::{
    Content, ContentEntry, ContentFilter, ContentKey, UNKNOWN_EXTENSION, UNKNOWN_MIME_TYPE,
};
pub use effect::{Effect, OverviewEvent};
pub use msg::OverviewCommand;
pub use state::{OverviewMode, OverviewState, SaveCandidate, Selection, ViewMode};
pub use update::update;
pub use view_model::{
    filtered_contents, passes_date_range, passes_filters, ArchiveRowView, ArchiveStatus,
    OverviewViewModel,
};
