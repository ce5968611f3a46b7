use std::sync::Arc;

use engine_logging::engine_debug;
use grokview_core::{update, OverviewCommand, OverviewEvent, OverviewState};
use grokview_engine::Engine;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::effects::EffectRunner;

const EVENT_CAPACITY: usize = 64;

/// The overview actor has stopped and no longer accepts commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("overview feature is no longer running")]
pub struct FeatureClosed;

pub(crate) struct Request {
    pub(crate) command: OverviewCommand,
    pub(crate) applied: Option<oneshot::Sender<()>>,
}

/// Handle to the task that owns [`OverviewState`].
///
/// Commands from every clone go through one queue and are applied strictly
/// one at a time in submission order. Each applied command publishes a fresh
/// snapshot before its effects are started.
#[derive(Clone)]
pub struct OverviewFeature {
    requests: mpsc::UnboundedSender<Request>,
    snapshots: watch::Receiver<OverviewState>,
    events: broadcast::Sender<OverviewEvent>,
    pending: watch::Receiver<usize>,
}

impl OverviewFeature {
    /// Starts the actor on the current tokio runtime.
    pub fn spawn(engine: Engine) -> Self {
        Self::spawn_with_state(engine, OverviewState::new())
    }

    pub fn spawn_with_state(engine: Engine, initial: OverviewState) -> Self {
        let (requests, inbox) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshots) = watch::channel(initial.clone());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (pending_tx, pending) = watch::channel(0);

        let runner = EffectRunner::new(
            engine,
            requests.downgrade(),
            events.clone(),
            Arc::new(pending_tx),
        );
        tokio::spawn(run_queue(initial, inbox, snapshot_tx, runner));

        Self {
            requests,
            snapshots,
            events,
            pending,
        }
    }

    /// Applies `command` and resolves once the resulting state is published.
    pub async fn execute(&self, command: OverviewCommand) -> Result<(), FeatureClosed> {
        let (applied, done) = oneshot::channel();
        self.requests
            .send(Request {
                command,
                applied: Some(applied),
            })
            .map_err(|_| FeatureClosed)?;
        done.await.map_err(|_| FeatureClosed)
    }

    /// Queues `command` without waiting for it to be applied.
    pub fn submit(&self, command: OverviewCommand) -> Result<(), FeatureClosed> {
        self.requests
            .send(Request {
                command,
                applied: None,
            })
            .map_err(|_| FeatureClosed)
    }

    /// Latest published snapshot.
    pub fn state(&self) -> OverviewState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OverviewState> {
        self.snapshots.clone()
    }

    /// Events published after this call; earlier ones are not replayed.
    pub fn events(&self) -> broadcast::Receiver<OverviewEvent> {
        self.events.subscribe()
    }

    /// Waits until every ingestion and export started so far has finished
    /// and its completion has been applied, then returns the snapshot.
    pub async fn settled(&self) -> Result<OverviewState, FeatureClosed> {
        let mut pending = self.pending.clone();
        pending
            .wait_for(|count| *count == 0)
            .await
            .map_err(|_| FeatureClosed)?;
        Ok(self.state())
    }
}

async fn run_queue(
    mut state: OverviewState,
    mut inbox: mpsc::UnboundedReceiver<Request>,
    snapshots: watch::Sender<OverviewState>,
    runner: EffectRunner,
) {
    while let Some(Request { command, applied }) = inbox.recv().await {
        engine_debug!("Applying {}", describe(&command));
        let (next, effects) = update(state, command);
        state = next;
        snapshots.send_replace(state.clone());
        runner.run(effects);
        if let Some(applied) = applied {
            let _ = applied.send(());
        }
    }
    engine_debug!("Overview queue closed");
}

fn describe(command: &OverviewCommand) -> String {
    match command {
        OverviewCommand::UploadArchives(paths) => format!("UploadArchives({} paths)", paths.len()),
        OverviewCommand::ArchiveIngested(archive) => format!("ArchiveIngested({})", archive.path()),
        OverviewCommand::AddToSelection(contents) => format!("AddToSelection({})", contents.len()),
        OverviewCommand::RemoveFromSelection(contents) => {
            format!("RemoveFromSelection({})", contents.len())
        }
        OverviewCommand::SaveContents(contents) => format!("SaveContents({})", contents.len()),
        OverviewCommand::SaveContent(content) => format!("SaveContent({})", content.id()),
        other => format!("{other:?}"),
    }
}
