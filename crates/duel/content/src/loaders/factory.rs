//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use duel_core::{BalanceTable, RuleProgram};

use crate::loaders::{BalanceLoader, LoadResult, Roster, RosterLoader, RuleLoader};

/// Content factory that loads duel content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── roster.ron
/// ├── balance.toml      (optional)
/// └── rules/
///     ├── brawler.ron
///     └── sentinel.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data set shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    /// Load the combatant roster from `roster.ron`.
    pub fn load_roster(&self) -> LoadResult<Roster> {
        RosterLoader::load(&self.data_dir.join("roster.ron"))
    }

    /// Load `balance.toml`, or the default balance when the file is absent.
    pub fn load_balance(&self) -> LoadResult<BalanceTable> {
        let path = self.data_dir.join("balance.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no balance file, using defaults");
            return Ok(BalanceTable::new());
        }
        BalanceLoader::load(&path)
    }

    /// Load the program `rules/{name}.ron`, falling back to
    /// `rules/{name}.json`.
    pub fn load_program(&self, name: &str) -> LoadResult<RuleProgram> {
        let rules_dir = self.data_dir.join("rules");
        let ron_path = rules_dir.join(format!("{}.ron", name));
        if ron_path.exists() {
            return RuleLoader::load(&ron_path);
        }
        let json_path = rules_dir.join(format!("{}.json", name));
        if json_path.exists() {
            return RuleLoader::load(&json_path);
        }
        anyhow::bail!(
            "No rule program named '{}' in {}",
            name,
            rules_dir.display()
        )
    }

    /// Names of every program in `rules/`, sorted.
    pub fn program_names(&self) -> LoadResult<Vec<String>> {
        let rules_dir = self.data_dir.join("rules");
        let entries = std::fs::read_dir(&rules_dir).map_err(|e| {
            anyhow::anyhow!("Failed to read directory {}: {}", rules_dir.display(), e)
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_rules = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("ron" | "json")
            );
            if let (true, Some(stem)) = (is_rules, path.file_stem().and_then(|s| s.to_str())) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
