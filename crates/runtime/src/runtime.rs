//! Arena orchestrator.
//!
//! The arena hands out concurrency slots, spawns battle workers, and exposes
//! a broadcast channel of [`ArenaEvent`]s. [`ArenaRuntime`] is cheap to clone;
//! clones share slots, metrics and subscribers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Semaphore, broadcast, oneshot};
use tracing::debug;

use crate::api::{ArenaEvent, BattleReport, BattleRequest, BattleTicket, Result, RuntimeError};
use crate::workers::{ArenaMetrics, BattleWorker};

/// Environment variable holding the maximum number of concurrent battles.
pub const MAX_CONCURRENCY_ENV: &str = "DUEL_MAX_CONCURRENCY";
/// Environment variable holding the per-battle timeout in milliseconds.
pub const TIMEOUT_MS_ENV: &str = "DUEL_TIMEOUT_MS";

/// Runtime configuration shared across the arena and its workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Battles allowed to compute at the same time.
    pub max_concurrency: usize,
    /// Per-battle timeout; `None` waits for every battle to finish.
    pub timeout: Option<Duration>,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_concurrency: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            timeout: None,
            event_buffer_size: 100,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `DUEL_MAX_CONCURRENCY` and `DUEL_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`RuntimeConfig::from_env`], reading variables through `lookup`.
    ///
    /// A timeout of `0` disables the timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(MAX_CONCURRENCY_ENV) {
            config.max_concurrency = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(RuntimeError::InvalidConfig {
                        key: MAX_CONCURRENCY_ENV,
                        value,
                    });
                }
            };
        }

        if let Some(value) = lookup(TIMEOUT_MS_ENV) {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|_| RuntimeError::InvalidConfig {
                    key: TIMEOUT_MS_ENV,
                    value: value.clone(),
                })?;
            config.timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        Ok(config)
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

struct Shared {
    config: RuntimeConfig,
    slots: Arc<Semaphore>,
    events: broadcast::Sender<ArenaEvent>,
    metrics: Arc<ArenaMetrics>,
    next_id: AtomicU64,
}

/// Runs battles with bounded concurrency.
#[derive(Clone)]
pub struct ArenaRuntime {
    shared: Arc<Shared>,
}

impl ArenaRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer_size.max(1));
        let slots = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        debug!(
            max_concurrency = config.max_concurrency,
            timeout = ?config.timeout,
            "arena created"
        );
        Self {
            shared: Arc::new(Shared {
                config,
                slots,
                events,
                metrics: Arc::new(ArenaMetrics::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.shared.config
    }

    pub fn metrics(&self) -> &ArenaMetrics {
        &self.shared.metrics
    }

    /// Subscribe to arena events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ArenaEvent> {
        self.shared.events.subscribe()
    }

    /// Runs one battle, waiting for a free slot first.
    pub async fn run(&self, request: BattleRequest) -> Result<BattleReport> {
        let id = self.next_id();
        self.run_with_id(id, request).await
    }

    /// Starts a battle in the background and returns a ticket for its report.
    pub fn submit(&self, request: BattleRequest) -> BattleTicket {
        let id = self.next_id();
        let (reply_tx, reply) = oneshot::channel();
        let arena = self.clone();
        tokio::spawn(async move {
            let report = arena.run_with_id(id, request).await;
            // Receiver dropped means nobody is waiting for this battle.
            let _ = reply_tx.send(report);
        });
        BattleTicket { id, reply }
    }

    /// Runs every request, at most `max_concurrency` at a time.
    ///
    /// Results are returned in request order regardless of completion order.
    pub async fn run_batch(&self, requests: Vec<BattleRequest>) -> Vec<Result<BattleReport>> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let id = self.next_id();
                let arena = self.clone();
                tokio::spawn(async move { arena.run_with_id(id, request).await })
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            reports.push(handle.await.unwrap_or_else(|e| Err(RuntimeError::WorkerJoin(e))));
        }
        reports
    }

    async fn run_with_id(&self, id: u64, request: BattleRequest) -> Result<BattleReport> {
        let _permit = self
            .shared
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| RuntimeError::ArenaClosed)?;

        BattleWorker {
            id,
            request,
            timeout: self.shared.config.timeout,
            events: self.shared.events.clone(),
            metrics: Arc::clone(&self.shared.metrics),
        }
        .run()
        .await
    }

    fn next_id(&self) -> u64 {
        self.shared.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for ArenaRuntime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn config_from_lookup() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            (MAX_CONCURRENCY_ENV, "3"),
            (TIMEOUT_MS_ENV, "250"),
        ]))
        .unwrap();
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = RuntimeConfig::from_lookup(lookup(&[(TIMEOUT_MS_ENV, "0")])).unwrap();
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_concurrency, RuntimeConfig::default().max_concurrency);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = RuntimeConfig::from_lookup(lookup(&[(MAX_CONCURRENCY_ENV, "0")])).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidConfig {
                key: MAX_CONCURRENCY_ENV,
                ..
            }
        ));

        let err = RuntimeConfig::from_lookup(lookup(&[(TIMEOUT_MS_ENV, "soon")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value \"soon\" for DUEL_TIMEOUT_MS");
    }
}
