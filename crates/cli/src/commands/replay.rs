//! Verify a saved battle against its digest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use duel_core::{BattleConfig, run_battle, verify_replay};

/// Re-run a saved battle configuration and check its digest
#[derive(Parser)]
pub struct Replay {
    /// Battle configuration saved with `duel run --save-config`
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Expected hex digest; prints the digest when omitted
    #[arg(short, long, value_name = "HEX")]
    digest: Option<String>,
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let json = std::fs::read_to_string(&self.config)
            .with_context(|| format!("Failed to read config: {}", self.config.display()))?;
        let config: BattleConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config: {}", self.config.display()))?;

        let Some(expected) = &self.digest else {
            let digest = run_battle(&config)?.digest()?;
            println!("{}", hex::encode(digest));
            return Ok(());
        };

        let bytes = hex::decode(expected.trim()).context("Digest is not valid hex")?;
        let expected: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| anyhow::anyhow!("Digest must be 32 bytes, got {}", b.len()))?;

        let check = verify_replay(&config, expected)?;
        if check.is_match() {
            println!("{} {}", style("MATCH").green().bold(), hex::encode(check.actual));
            Ok(())
        } else {
            println!(
                "{} expected {} got {}",
                style("MISMATCH").red().bold(),
                hex::encode(check.expected),
                hex::encode(check.actual)
            );
            anyhow::bail!("replay digest mismatch")
        }
    }
}
