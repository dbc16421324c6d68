//! Worker tasks that back the arena.
//!
//! The battle worker computes one battle on the blocking pool; metrics are
//! shared by every worker of an arena.

mod battle;
mod metrics;

pub(crate) use battle::BattleWorker;
pub use metrics::{ArenaMetrics, MetricsSnapshot};
