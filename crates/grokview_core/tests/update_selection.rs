mod common;

use common::{apply, assert_selection_consistent, content, init_logging, with_archive};
use grokview_core::{update, OverviewCommand, OverviewMode, OverviewState, SaveCandidate};
use pretty_assertions::assert_eq;

#[test]
fn adding_to_default_creates_selection_in_insertion_order() {
    init_logging();
    let a = content("/data/a.zip", "1", "image/png", None);
    let b = content("/data/a.zip", "2", "image/png", None);

    let (state, _) = update(
        OverviewState::new(),
        OverviewCommand::AddToSelection(vec![b.clone(), a.clone(), b.clone()]),
    );

    let selection = state.selection().expect("selection mode");
    let ids: Vec<_> = selection.content_ids().iter().map(|k| k.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert_eq!(selection.contents().len(), 2);
    assert_eq!(selection.ordered_contents(), vec![b, a]);
    assert_selection_consistent(&state);
}

#[test]
fn adding_nothing_stays_default() {
    init_logging();
    let (state, _) = update(OverviewState::new(), OverviewCommand::AddToSelection(Vec::new()));
    assert_eq!(state.mode(), &OverviewMode::Default);
}

#[test]
fn removing_last_item_reverts_to_default() {
    init_logging();
    let a = content("/data/a.zip", "1", "image/png", None);
    let b = content("/data/a.zip", "2", "text/plain", None);
    let (state, _) = apply(
        OverviewState::new(),
        vec![
            OverviewCommand::AddToSelection(vec![a.clone(), b.clone()]),
            OverviewCommand::RemoveFromSelection(vec![a.clone()]),
        ],
    );
    assert!(state.is_selected(&b));
    assert!(!state.is_selected(&a));
    assert_selection_consistent(&state);

    let (state, _) = update(state, OverviewCommand::RemoveFromSelection(vec![b]));
    assert_eq!(state.mode(), &OverviewMode::Default);
}

#[test]
fn same_id_in_different_archives_are_distinct_items() {
    init_logging();
    let a = content("/data/a.zip", "same", "image/png", None);
    let b = content("/data/b.zip", "same", "image/png", None);
    let (state, _) = update(
        OverviewState::new(),
        OverviewCommand::AddToSelection(vec![a.clone(), b.clone()]),
    );

    assert_eq!(state.selection().unwrap().len(), 2);
    assert_selection_consistent(&state);

    let (state, _) = update(state, OverviewCommand::RemoveFromSelection(vec![a]));
    assert_eq!(state.selection().unwrap().ordered_contents(), vec![b]);
}

#[test]
fn selection_invariant_holds_across_mixed_sequences() {
    init_logging();
    let items: Vec<_> = (0..6)
        .map(|i| content("/data/a.zip", &i.to_string(), "image/png", None))
        .collect();
    // Deterministic pseudo-random walk over add/remove commands.
    let mut seed: u32 = 7;
    let mut state = OverviewState::new();
    for _ in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let pick = (seed >> 16) as usize % items.len();
        let span = 1 + (seed >> 8) as usize % 3;
        let chosen: Vec<_> = items.iter().cycle().skip(pick).take(span).cloned().collect();
        let command = if (seed >> 20) % 3 != 0 {
            OverviewCommand::AddToSelection(chosen)
        } else {
            OverviewCommand::RemoveFromSelection(chosen)
        };
        state = update(state, command).0;
        assert_selection_consistent(&state);
    }
}

#[test]
fn clear_selection_discards_everything() {
    init_logging();
    let a = content("/data/a.zip", "1", "image/png", None);
    let (state, _) = apply(
        OverviewState::new(),
        vec![
            OverviewCommand::AddToSelection(vec![a.clone()]),
            OverviewCommand::ClearSelection,
        ],
    );
    assert_eq!(state.mode(), &OverviewMode::Default);
    assert!(!state.is_selected(&a));
}

#[test]
fn remove_archive_purges_its_selected_contents() {
    init_logging();
    let a1 = content("/data/a.zip", "1", "image/png", None);
    let a2 = content("/data/a.zip", "2", "image/png", None);
    let b1 = content("/data/b.zip", "1", "image/png", None);
    let state = with_archive(OverviewState::new(), "/data/a.zip", vec![a1.clone(), a2.clone()]);
    let state = with_archive(state, "/data/b.zip", vec![b1.clone()]);

    let (state, _) = apply(
        state,
        vec![
            OverviewCommand::AddToSelection(vec![a1.clone(), b1.clone(), a2.clone()]),
            OverviewCommand::RemoveArchive("/data/a.zip".into()),
        ],
    );
    assert_eq!(state.overview_archives().len(), 1);
    assert_eq!(state.selection().unwrap().ordered_contents(), vec![b1.clone()]);
    assert_selection_consistent(&state);

    let (state, _) = update(state, OverviewCommand::RemoveArchive("/data/b.zip".into()));
    assert_eq!(state.mode(), &OverviewMode::Default);
    assert!(state.overview_archives().is_empty());
}

#[test]
fn remove_archive_drops_candidates_that_read_from_it() {
    init_logging();
    let a1 = content("/data/a.zip", "1", "image/png", None);
    let b1 = content("/data/b.zip", "1", "image/png", None);
    let state = with_archive(OverviewState::new(), "/data/a.zip", vec![a1.clone()]);
    let state = with_archive(state, "/data/b.zip", vec![b1.clone()]);

    let (state, _) = apply(
        state,
        vec![
            OverviewCommand::SaveContents(vec![a1.clone(), b1.clone()]),
            OverviewCommand::RemoveArchive("/data/a.zip".into()),
        ],
    );
    assert_eq!(
        state.save_candidate(),
        Some(&SaveCandidate::Contents(vec![b1.clone()]))
    );

    let (state, _) = apply(
        state,
        vec![
            OverviewCommand::SaveContent(b1),
            OverviewCommand::RemoveArchive("/data/b.zip".into()),
        ],
    );
    assert_eq!(state.save_candidate(), None);
}

#[test]
fn large_selections_stay_ordered_and_fast() {
    init_logging();
    let contents: Vec<_> = (0..20_000)
        .map(|i| content("/data/big.zip", &format!("{i:05}"), "image/png", None))
        .collect();
    let started = std::time::Instant::now();

    let (state, _) = update(
        OverviewState::new(),
        OverviewCommand::AddToSelection(contents.clone()),
    );
    let (state, _) = update(
        state,
        OverviewCommand::AddToSelection(contents[..100].to_vec()),
    );
    let odd: Vec<_> = contents.iter().skip(1).step_by(2).cloned().collect();
    let (state, _) = update(state, OverviewCommand::RemoveFromSelection(odd));

    let selection = state.selection().expect("selection mode");
    let ordered = selection.ordered_contents();
    let expected: Vec<_> = contents.iter().step_by(2).cloned().collect();
    assert_eq!(ordered.len(), 10_000);
    assert!(ordered == expected);
    assert!(state.is_selected(&contents[0]));
    assert!(!state.is_selected(&contents[1]));
    assert_selection_consistent(&state);
    assert!(
        started.elapsed() < std::time::Duration::from_secs(5),
        "selection took {:?}",
        started.elapsed()
    );
}
