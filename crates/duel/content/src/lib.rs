//! Data-driven content for the duel engine.
//!
//! Loaders read data files into `duel-core` types:
//! - combatant rosters (RON)
//! - rule programs (RON or JSON, with string tags)
//! - balance tables (TOML)
//!
//! A default data set ships in this crate's `data/` directory and is reachable
//! through [`ContentFactory::bundled`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BalanceLoader, ContentFactory, LoadResult, Roster, RosterLoader, RuleFile, RuleLoader,
    RuleSpec, compile_rules,
};
