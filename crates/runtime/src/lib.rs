//! Async arena runtime for the deterministic duel engine.
//!
//! `duel-core` is a pure, synchronous computation. This crate runs many
//! battles at once on tokio's blocking pool, bounds how many run together,
//! optionally gives up on slow battles, and publishes lifecycle events to
//! subscribers. Consumers embed [`ArenaRuntime`] and submit
//! [`BattleRequest`]s.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the arena and its configuration
//! - [`api`] exposes the request, report, event and error types
//! - [`sweep`] aggregates reports from seed sweeps
//! - `workers` runs individual battles and keeps metrics
pub mod api;
pub mod runtime;
pub mod sweep;

mod workers;

pub use api::{ArenaEvent, BattleReport, BattleRequest, BattleTicket, Result, RuntimeError};
pub use runtime::{ArenaRuntime, RuntimeConfig};
pub use sweep::SweepSummary;
pub use workers::{ArenaMetrics, MetricsSnapshot};
