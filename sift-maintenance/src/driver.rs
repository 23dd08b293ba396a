//! Host-side loop: an interval ticker feeds `Tick` commands to an engine
//! owned by a blocking worker. The engine itself stays synchronous.

use std::time::Duration;

use sift_core::errors::{SchedulerError, SiftError, SiftResult};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::command::{CommandResponse, MaintenanceCommand};
use crate::engine::MaintenanceEngine;

const COMMAND_BUFFER: usize = 32;

struct Envelope {
    command: MaintenanceCommand,
    reply: Option<oneshot::Sender<SiftResult<CommandResponse>>>,
}

pub struct DriverHandle {
    commands: mpsc::Sender<Envelope>,
    ticker: JoinHandle<()>,
    worker: JoinHandle<MaintenanceEngine>,
}

/// Start the worker and a ticker sending `Tick` every `tick_every`.
/// Must be called inside a tokio runtime.
pub fn spawn(engine: MaintenanceEngine, tick_every: Duration) -> DriverHandle {
    let (commands, mut inbox) = mpsc::channel::<Envelope>(COMMAND_BUFFER);

    let worker = tokio::task::spawn_blocking(move || {
        let mut engine = engine;
        while let Some(envelope) = inbox.blocking_recv() {
            let stop = envelope.command == MaintenanceCommand::Shutdown;
            let result = engine.handle(envelope.command);
            match envelope.reply {
                Some(reply) => {
                    // The caller may have stopped waiting.
                    let _ = reply.send(result);
                }
                None => {
                    if let Err(e) = result {
                        warn!(error = %e, "scheduled maintenance tick failed");
                    }
                }
            }
            if stop {
                break;
            }
        }
        debug!("maintenance worker stopped");
        engine
    });

    let tick_sender = commands.clone();
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let tick = Envelope {
                command: MaintenanceCommand::Tick,
                reply: None,
            };
            if tick_sender.send(tick).await.is_err() {
                break;
            }
        }
    });

    DriverHandle {
        commands,
        ticker,
        worker,
    }
}

fn stopped() -> SiftError {
    SiftError::SchedulerError(SchedulerError::DriverStopped)
}

impl DriverHandle {
    /// Send a command and wait for the engine's response.
    pub async fn send(&self, command: MaintenanceCommand) -> SiftResult<CommandResponse> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope {
                command,
                reply: Some(reply),
            })
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())?
    }

    /// Stop ticking, drain queued commands, and hand the engine back.
    pub async fn shutdown(self) -> SiftResult<MaintenanceEngine> {
        self.ticker.abort();
        self.send(MaintenanceCommand::Shutdown).await?;
        drop(self.commands);
        self.worker.await.map_err(|_| stopped())
    }
}
