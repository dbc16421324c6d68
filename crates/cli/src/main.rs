//! `duel` command-line front-end.
//!
//! Loads combatants and rule programs from a data directory, runs battles on
//! the arena runtime and prints the outcome as JSON or narrated text. Logs go
//! to stderr so stdout stays machine-readable.

mod commands;
mod content;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Elements, Replay, Run, Sweep};

/// Deterministic robot duels from the command line
#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Run deterministic robot duels", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a single battle
    Run(Run),

    /// Run one matchup over a range of seeds and tally the outcomes
    Sweep(Sweep),

    /// Print the element advantage cycle and multiplier table
    Elements(Elements),

    /// Re-run a saved battle configuration and check its digest
    Replay(Replay),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for DUEL_* and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute().await,
        Command::Sweep(cmd) => cmd.execute().await,
        Command::Elements(cmd) => cmd.execute(),
        Command::Replay(cmd) => cmd.execute(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_negative_seed() {
        let cli = Cli::try_parse_from([
            "duel",
            "run",
            "pyro-reaver",
            "cryo-warden",
            "--seed",
            "-7",
            "--rules-two",
            "berserker",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Run(_)));
    }

    #[test]
    fn sweep_requires_both_combatants() {
        assert!(Cli::try_parse_from(["duel", "sweep", "pyro-reaver"]).is_err());
    }
}
