use std::sync::Arc;

use engine_logging::{engine_debug, engine_info, engine_warn};
use grokview_core::{Effect, OverviewCommand, OverviewEvent};
use grokview_engine::Engine;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::feature::Request;

/// Runs reducer effects against the engine and feeds completions back into
/// the overview queue as commands.
pub(crate) struct EffectRunner {
    engine: Engine,
    requests: mpsc::WeakUnboundedSender<Request>,
    events: broadcast::Sender<OverviewEvent>,
    pending: Arc<watch::Sender<usize>>,
}

impl EffectRunner {
    pub(crate) fn new(
        engine: Engine,
        requests: mpsc::WeakUnboundedSender<Request>,
        events: broadcast::Sender<OverviewEvent>,
        pending: Arc<watch::Sender<usize>>,
    ) -> Self {
        Self {
            engine,
            requests,
            events,
            pending,
        }
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::IngestArchive { path } => {
                    engine_info!("IngestArchive path={}", path);
                    let engine = self.engine.clone();
                    self.spawn_feedback(async move {
                        OverviewCommand::ArchiveIngested(engine.ingest(path).await)
                    });
                }
                Effect::Export {
                    candidate,
                    directory,
                    name,
                } => {
                    engine_info!("Export to {} name={}", directory, name);
                    let engine = self.engine.clone();
                    self.spawn_feedback(async move {
                        let result = match engine.export(candidate, directory, name).await {
                            Ok(path) => {
                                engine_info!("Export written to {}", path.display());
                                Ok(path.display().to_string())
                            }
                            Err(err) => {
                                engine_warn!("Export failed: {}", err);
                                Err(err.to_string())
                            }
                        };
                        OverviewCommand::ExportFinished(result)
                    });
                }
                Effect::Notify(event) => {
                    if self.events.send(event).is_err() {
                        engine_debug!("No listeners for overview event");
                    }
                }
            }
        }
    }

    /// Runs `work` in the background and queues the command it yields. The
    /// pending count drops only once that command has been applied.
    fn spawn_feedback<F>(&self, work: F)
    where
        F: std::future::Future<Output = OverviewCommand> + Send + 'static,
    {
        let guard = PendingGuard::acquire(self.pending.clone());
        let requests = self.requests.clone();
        tokio::spawn(async move {
            let command = work.await;
            let Some(sender) = requests.upgrade() else {
                engine_debug!("Overview queue closed; dropping completion");
                return;
            };
            let (applied, done) = oneshot::channel();
            let queued = sender
                .send(Request {
                    command,
                    applied: Some(applied),
                })
                .is_ok();
            drop(sender);
            if queued {
                let _ = done.await;
            }
            drop(guard);
        });
    }
}

struct PendingGuard(Arc<watch::Sender<usize>>);

impl PendingGuard {
    fn acquire(pending: Arc<watch::Sender<usize>>) -> Self {
        pending.send_modify(|count| *count += 1);
        Self(pending)
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.send_modify(|count| *count = count.saturating_sub(1));
    }
}
