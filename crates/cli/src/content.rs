//! Matchup arguments shared by `run` and `sweep`.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Args;

use duel_content::{BalanceLoader, ContentFactory};
use duel_core::{BattleConfig, DEFAULT_ROUND_CAP, derive_battle_seed, normalize_seed};

#[derive(Args, Debug, Clone)]
pub struct MatchupArgs {
    /// Roster id of the side one combatant
    #[arg(value_name = "ONE")]
    pub one: String,

    /// Roster id of the side two combatant
    #[arg(value_name = "TWO")]
    pub two: String,

    /// Rule program for side one (name under rules/)
    #[arg(long, default_value = "tactician")]
    pub rules_one: String,

    /// Rule program for side two (name under rules/)
    #[arg(long, default_value = "tactician")]
    pub rules_two: String,

    /// Data directory with roster.ron and rules/ (defaults to the bundled set)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Balance table overriding the data directory's balance.toml
    #[arg(short, long, value_name = "FILE")]
    pub balance: Option<PathBuf>,

    /// Round cap
    #[arg(long, default_value_t = DEFAULT_ROUND_CAP)]
    pub round_cap: u32,
}

impl MatchupArgs {
    pub fn factory(&self) -> ContentFactory {
        match &self.data_dir {
            Some(dir) => ContentFactory::new(dir.clone()),
            None => ContentFactory::bundled(),
        }
    }

    /// Builds the battle configuration for `seed`.
    pub fn config(&self, seed: u32) -> Result<BattleConfig> {
        let factory = self.factory();
        let roster = factory.load_roster()?;
        let lookup = |id: &str| {
            roster.get(id).cloned().with_context(|| {
                let known: Vec<_> = roster.ids().collect();
                format!("unknown combatant '{}' (known: {})", id, known.join(", "))
            })
        };

        let balance = match &self.balance {
            Some(path) => BalanceLoader::load(path)?,
            None => factory.load_balance()?,
        };

        Ok(BattleConfig::new(
            seed,
            lookup(&self.one)?,
            lookup(&self.two)?,
            factory.load_program(&self.rules_one)?,
            factory.load_program(&self.rules_two)?,
        )
        .with_round_cap(self.round_cap)
        .with_balance(balance))
    }

    /// `seed` normalized to 32 bits, or one derived from the ids and the
    /// current time.
    pub fn seed(&self, seed: Option<i64>) -> u32 {
        match seed {
            Some(seed) => normalize_seed(seed),
            None => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or_default();
                derive_battle_seed(&self.one, &self.two, now)
            }
        }
    }
}
