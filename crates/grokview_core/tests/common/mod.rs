#![allow(dead_code)]

use std::sync::Once;

use grokview_core::{update, Archive, Content, ContentEntry, Effect, OverviewCommand, OverviewState};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn content(zip: &str, id: &str, mime: &str, last_modified: Option<i64>) -> Content {
    let entry = ContentEntry {
        id: id.to_string(),
        path: format!("files/{id}"),
        mime_type: mime.to_string(),
        entry_name: format!("files/{id}"),
        zip_file_path: zip.to_string(),
        last_modified,
        size: 10,
    };
    match mime.split_once('/') {
        Some((_, sub)) if mime != grokview_core::UNKNOWN_MIME_TYPE => Content::Resolved {
            entry,
            extension: sub.to_string(),
        },
        _ => Content::Unknown(entry),
    }
}

pub fn processed(path: &str, contents: Vec<Content>) -> Archive {
    Archive::Processed {
        path: path.to_string(),
        name: grokview_core::archive_name(path),
        contents,
    }
}

pub fn apply(state: OverviewState, commands: Vec<OverviewCommand>) -> (OverviewState, Vec<Effect>) {
    commands.into_iter().fold((state, Vec::new()), |(state, mut all), command| {
        let (state, effects) = update(state, command);
        all.extend(effects);
        (state, all)
    })
}

/// Uploads `path` and completes its ingestion with `contents`.
pub fn with_archive(state: OverviewState, path: &str, contents: Vec<Content>) -> OverviewState {
    let (state, _) = apply(
        state,
        vec![
            OverviewCommand::UploadArchives(vec![path.to_string()]),
            OverviewCommand::ArchiveIngested(processed(path, contents)),
        ],
    );
    state
}

/// Checks that the selection's two views agree.
pub fn assert_selection_consistent(state: &OverviewState) {
    if let Some(selection) = state.selection() {
        assert!(!selection.is_empty());
        assert_eq!(selection.content_ids().len(), selection.contents().len());
        for key in selection.content_ids() {
            let content = selection
                .contents()
                .get(key)
                .unwrap_or_else(|| panic!("key {key:?} has no selected content"));
            assert_eq!(&content.key(), key);
        }
    }
}
