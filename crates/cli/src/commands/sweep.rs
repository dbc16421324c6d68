//! Run one matchup over a range of seeds.

use anyhow::Result;
use clap::Parser;

use duel_runtime::{ArenaRuntime, BattleRequest, RuntimeConfig, SweepSummary};

use super::OutputFormat;
use crate::content::MatchupArgs;
use crate::render;

/// Run one matchup over a range of seeds and tally the outcomes
#[derive(Parser)]
pub struct Sweep {
    #[command(flatten)]
    matchup: MatchupArgs,

    /// Number of battles
    #[arg(short = 'n', long, default_value_t = 100)]
    count: u32,

    /// First seed of the range
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Sweep {
    pub async fn execute(self) -> Result<()> {
        let base = self.matchup.config(self.start)?;
        let names = base.combatants.clone().map(|c| c.name);
        let seeds = (0..self.count).map(|offset| self.start.wrapping_add(offset));

        let arena = ArenaRuntime::new(RuntimeConfig::from_env()?);
        let results = arena.run_batch(BattleRequest::sweep(&base, seeds)).await;

        let mut summary = SweepSummary::default();
        let mut failures = 0;
        for result in &results {
            match result {
                Ok(report) => summary.record(report),
                Err(e) => {
                    failures += 1;
                    tracing::warn!("battle failed: {}", e);
                }
            }
        }
        if failures > 0 {
            tracing::warn!(failures, "some battles did not finish");
        }

        let metrics = arena.metrics().snapshot();
        tracing::info!(
            completed = metrics.completed,
            peak_in_flight = metrics.peak_in_flight,
            avg_compute_time = ?metrics.avg_compute_time,
            "sweep finished"
        );

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Text => render::print_summary(&summary, &names),
        }
        Ok(())
    }
}
