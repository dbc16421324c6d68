//! Single-battle worker.
//!
//! Runs one `duel-core` battle on tokio's blocking pool, applies the
//! optional timeout, and turns the outcome into a report, an event and a
//! metrics update.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use duel_core::run_battle;

use super::metrics::ArenaMetrics;
use crate::api::{ArenaEvent, BattleReport, BattleRequest, Result, RuntimeError};

pub(crate) struct BattleWorker {
    pub(crate) id: u64,
    pub(crate) request: BattleRequest,
    pub(crate) timeout: Option<Duration>,
    pub(crate) events: broadcast::Sender<ArenaEvent>,
    pub(crate) metrics: Arc<ArenaMetrics>,
}

impl BattleWorker {
    pub(crate) async fn run(self) -> Result<BattleReport> {
        let Self {
            id,
            request,
            timeout,
            events,
            metrics,
        } = self;
        let BattleRequest { label, config } = request;

        debug!(id, label = %label, seed = config.seed, "battle started");
        publish(
            &events,
            ArenaEvent::BattleStarted {
                id,
                label: label.clone(),
                seed: config.seed,
            },
        );
        metrics.record_start();

        let task = tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            let result = run_battle(&config);
            (result, started.elapsed())
        });

        let joined = match timeout {
            Some(after) => match tokio::time::timeout(after, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    // The blocking task cannot be cancelled; it completes in
                    // the background and its result is dropped.
                    metrics.record_end();
                    metrics.record_timeout();
                    warn!(id, label = %label, ?after, "battle timed out");
                    publish(
                        &events,
                        ArenaEvent::BattleTimedOut {
                            id,
                            label,
                            after_ms: after.as_millis() as u64,
                        },
                    );
                    return Err(RuntimeError::Timeout { id, after });
                }
            },
            None => task.await,
        };
        metrics.record_end();

        let (result, elapsed) = joined.map_err(|e| {
            metrics.record_failure();
            RuntimeError::WorkerJoin(e)
        })?;

        let result = match result {
            Ok(result) => result,
            Err(source) => {
                metrics.record_failure();
                warn!(id, label = %label, code = source.error_code(), "battle rejected: {}", source);
                publish(
                    &events,
                    ArenaEvent::BattleFailed {
                        id,
                        label,
                        error: source.to_string(),
                    },
                );
                return Err(RuntimeError::Setup { id, source });
            }
        };

        let digest = result.digest().map_err(|source| {
            metrics.record_failure();
            RuntimeError::Digest { id, source }
        })?;
        let digest = hex::encode(digest);

        metrics.record_success(result.rounds, elapsed);
        info!(
            id,
            label = %label,
            winner = ?result.winner,
            rounds = result.rounds,
            ?elapsed,
            "battle finished"
        );
        publish(
            &events,
            ArenaEvent::BattleFinished {
                id,
                label: label.clone(),
                winner: result.winner.clone(),
                rounds: result.rounds,
                digest: digest.clone(),
            },
        );

        Ok(BattleReport {
            id,
            label,
            result,
            digest,
            elapsed,
        })
    }
}

fn publish(events: &broadcast::Sender<ArenaEvent>, event: ArenaEvent) {
    if events.send(event).is_err() {
        // No subscribers - this is normal, not an error
        tracing::trace!("no arena event subscribers");
    }
}
