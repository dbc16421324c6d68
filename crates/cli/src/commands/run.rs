//! Run a single battle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use duel_runtime::{ArenaRuntime, BattleRequest, RuntimeConfig};

use super::OutputFormat;
use crate::content::MatchupArgs;
use crate::render;

/// Run a single battle
#[derive(Parser)]
pub struct Run {
    #[command(flatten)]
    matchup: MatchupArgs,

    /// Battle seed; negative values wrap to 32 bits. Derived from the ids
    /// and the current time when omitted
    #[arg(short, long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Save the battle configuration as JSON for `duel replay`
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,
}

impl Run {
    pub async fn execute(self) -> Result<()> {
        let seed = self.matchup.seed(self.seed);
        let config = self.matchup.config(seed)?;
        let names = config.combatants.clone().map(|c| c.name);

        if let Some(path) = &self.save_config {
            let json = serde_json::to_string_pretty(&config)?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write config: {}", path.display()))?;
            tracing::info!(path = %path.display(), "saved battle config");
        }

        let arena = ArenaRuntime::new(RuntimeConfig::from_env()?);
        let report = arena.run(BattleRequest::new(config)).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => render::print_battle(&report, &names),
        }
        Ok(())
    }
}
