//! Subcommands of the `duel` binary.

mod elements;
mod replay;
mod run;
mod sweep;

pub use elements::Elements;
pub use replay::Replay;
pub use run::Run;
pub use sweep::Sweep;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Narrated, colored text
    Text,
    /// Pretty-printed JSON
    Json,
}
