//! Balance table loader.

use std::path::Path;

use duel_core::BalanceTable;

use crate::loaders::{LoadResult, read_file};

/// Loader for balance tables from TOML files.
///
/// Every table and field is optional; omitted values keep their defaults, so
/// a file only needs the constants it overrides:
///
/// ```toml
/// starting_energy = 0.25
///
/// [elements]
/// advantage = 1.2
/// ```
pub struct BalanceLoader;

impl BalanceLoader {
    /// Load and validate a balance table from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BalanceTable> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid balance table {}: {}", path.display(), e))
    }

    /// Parse and validate a balance table from TOML text.
    pub fn parse(content: &str) -> LoadResult<BalanceTable> {
        let balance: BalanceTable = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))?;
        balance.validate()?;
        Ok(balance)
    }
}
