//! Combatant roster loader.

use std::collections::HashSet;
use std::path::Path;

use duel_core::CombatantDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Roster structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub combatants: Vec<CombatantDefinition>,
}

impl Roster {
    pub fn get(&self, id: &str) -> Option<&CombatantDefinition> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.combatants.iter().map(|c| c.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

/// Loader for combatant rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// Each definition is validated, and ids must be unique within the file.
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid roster {}: {}", path.display(), e))
    }

    /// Parse and validate a roster from RON text.
    pub fn parse(content: &str) -> LoadResult<Roster> {
        let roster: Roster = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let mut seen = HashSet::new();
        for definition in &roster.combatants {
            if !seen.insert(definition.id.as_str()) {
                anyhow::bail!("duplicate combatant id '{}'", definition.id);
            }
            definition.validate()?;
        }

        tracing::debug!(combatants = roster.len(), "loaded roster");
        Ok(roster)
    }
}
