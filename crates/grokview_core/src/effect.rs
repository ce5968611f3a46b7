use crate::SaveCandidate;

/// Work requested by [`crate::update`] and executed outside the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    IngestArchive {
        path: String,
    },
    Export {
        candidate: SaveCandidate,
        directory: String,
        name: String,
    },
    Notify(OverviewEvent),
}

/// Fire-once notifications for transient, user-visible failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverviewEvent {
    Error(String),
}
