//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the arena and workers can stay focused on scheduling.

pub mod errors;
pub mod events;
pub mod request;

pub use errors::{Result, RuntimeError};
pub use events::ArenaEvent;
pub use request::{BattleReport, BattleRequest, BattleTicket};
