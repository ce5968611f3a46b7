use std::collections::HashSet;

use crate::{
    Archive, Content, Effect, OverviewArchive, OverviewCommand, OverviewEvent, OverviewMode,
    OverviewState, SaveCandidate, Selection,
};

/// Pure update function: applies a command to state and returns any effects.
pub fn update(mut state: OverviewState, command: OverviewCommand) -> (OverviewState, Vec<Effect>) {
    let effects = match command {
        OverviewCommand::UploadArchives(paths) => {
            let mut effects = Vec::new();
            for path in paths {
                if state.tracks(&path) {
                    continue;
                }
                state
                    .overview_archives
                    .push(OverviewArchive::collapsed(Archive::processing(path.clone())));
                effects.push(Effect::IngestArchive { path });
            }
            effects
        }
        OverviewCommand::ArchiveIngested(archive) => apply_ingested(&mut state, archive),
        OverviewCommand::ToggleArchiveExpansion(path) => {
            if let Some(overview_archive) = state.overview_archive_mut(&path) {
                overview_archive.expansion = overview_archive.expansion.toggled();
            }
            Vec::new()
        }
        OverviewCommand::AddToSelection(contents) => {
            match &mut state.mode {
                OverviewMode::Default => {
                    if let Some(selection) = Selection::from_contents(&contents) {
                        state.mode = OverviewMode::Selection(selection);
                    }
                }
                OverviewMode::Selection(selection) => selection.add(&contents),
            }
            Vec::new()
        }
        OverviewCommand::RemoveFromSelection(contents) => {
            let keys: HashSet<_> = contents.iter().map(Content::key).collect();
            state.edit_selection(|selection| selection.remove_keys(&keys));
            Vec::new()
        }
        OverviewCommand::ClearSelection => {
            state.mode = OverviewMode::Default;
            Vec::new()
        }
        OverviewCommand::AddContentFilter(filter) => {
            state.content_filters.insert(filter);
            Vec::new()
        }
        OverviewCommand::RemoveContentFilter(filter) => {
            state.content_filters.remove(&filter);
            Vec::new()
        }
        OverviewCommand::SetDateRange { start, end } => {
            state.date_range_start = start;
            state.date_range_end = end;
            Vec::new()
        }
        OverviewCommand::SetViewMode(view_mode) => {
            state.view_mode = view_mode;
            Vec::new()
        }
        OverviewCommand::SaveContent(content) => {
            state.save_candidate = Some(SaveCandidate::Content(content));
            Vec::new()
        }
        OverviewCommand::SaveArchive(path) => {
            let candidate = match state.overview_archive(&path).map(|o| &o.archive) {
                Some(archive @ Archive::Processed { .. }) => Some(archive.clone()),
                _ => None,
            };
            if let Some(archive) = candidate {
                state.save_candidate = Some(SaveCandidate::Archive(archive));
            }
            Vec::new()
        }
        OverviewCommand::SaveContents(contents) => {
            if !contents.is_empty() {
                state.save_candidate = Some(SaveCandidate::Contents(contents));
            }
            Vec::new()
        }
        OverviewCommand::SaveConfirmation { path, name } => match state.save_candidate.take() {
            Some(candidate) => {
                state.last_directory_path = Some(path.clone());
                vec![Effect::Export {
                    candidate,
                    directory: path,
                    name,
                }]
            }
            None => Vec::new(),
        },
        OverviewCommand::SaveCancellation => {
            state.save_candidate = None;
            Vec::new()
        }
        OverviewCommand::ExportFinished(result) => match result {
            Ok(_) => Vec::new(),
            Err(message) => vec![Effect::Notify(OverviewEvent::Error(message))],
        },
        OverviewCommand::RemoveArchive(path) => {
            remove_archive(&mut state, &path);
            Vec::new()
        }
        OverviewCommand::UpdateHovering(is_hovered) => {
            state.is_hovered = is_hovered;
            Vec::new()
        }
    };

    (state, effects)
}

fn apply_ingested(state: &mut OverviewState, archive: Archive) -> Vec<Effect> {
    let Some(overview_archive) = state.overview_archive_mut(archive.path()) else {
        return Vec::new();
    };
    if overview_archive.archive.is_terminal() {
        return Vec::new();
    }

    let effects = match &archive {
        Archive::Failure { name, cause, .. } => vec![Effect::Notify(OverviewEvent::Error(
            format!("Failed to upload archive {name}: {cause}"),
        ))],
        Archive::Processing { .. } => return Vec::new(),
        Archive::Processed { .. } => Vec::new(),
    };
    overview_archive.archive = archive;
    effects
}

fn remove_archive(state: &mut OverviewState, path: &str) {
    let before = state.overview_archives.len();
    state
        .overview_archives
        .retain(|overview_archive| overview_archive.path() != path);
    if state.overview_archives.len() == before {
        return;
    }

    state.edit_selection(|selection| {
        selection.remove_where(|content| content.zip_file_path() == path);
    });

    let candidate = state.save_candidate.take();
    state.save_candidate = match candidate {
        Some(SaveCandidate::Contents(contents)) => {
            let remaining: Vec<_> = contents
                .into_iter()
                .filter(|content| content.zip_file_path() != path)
                .collect();
            (!remaining.is_empty()).then_some(SaveCandidate::Contents(remaining))
        }
        Some(candidate) if candidate.refers_to(path) => None,
        other => other,
    };
}
