//! Content loaders for reading duel data from files.

pub mod balance;
pub mod factory;
pub mod roster;
pub mod rules;

pub use balance::BalanceLoader;
pub use factory::ContentFactory;
pub use roster::{Roster, RosterLoader};
pub use rules::{RuleFile, RuleLoader, RuleSpec, compile_rules};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
