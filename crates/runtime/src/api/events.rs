//! Events emitted by the arena for front-ends to observe.
//!
//! Consumers subscribe to [`ArenaEvent`] to follow battles without waiting
//! on individual results. Delivery is best-effort: a lagging subscriber
//! misses events rather than slowing the arena down.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    /// A battle acquired a concurrency slot and started computing.
    BattleStarted { id: u64, label: String, seed: u32 },
    /// A battle completed.
    BattleFinished {
        id: u64,
        label: String,
        winner: Option<String>,
        rounds: u32,
        /// Hex SHA-256 replay digest.
        digest: String,
    },
    /// The configuration was rejected before the first round.
    BattleFailed { id: u64, label: String, error: String },
    /// The battle exceeded the configured timeout.
    BattleTimedOut { id: u64, label: String, after_ms: u64 },
}

impl ArenaEvent {
    pub fn battle_id(&self) -> u64 {
        match self {
            ArenaEvent::BattleStarted { id, .. }
            | ArenaEvent::BattleFinished { id, .. }
            | ArenaEvent::BattleFailed { id, .. }
            | ArenaEvent::BattleTimedOut { id, .. } => *id,
        }
    }
}
