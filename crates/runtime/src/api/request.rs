//! Battle requests, reports and tickets.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use duel_core::{BattleConfig, BattleResult, Side};

use super::errors::{Result, RuntimeError};

/// One battle to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRequest {
    /// Human-readable tag carried into events and reports.
    pub label: String,
    pub config: BattleConfig,
}

impl BattleRequest {
    /// Request labelled `"<side one id> vs <side two id>"`.
    pub fn new(config: BattleConfig) -> Self {
        let label = format!(
            "{} vs {}",
            config.combatant(Side::One).id,
            config.combatant(Side::Two).id
        );
        Self { label, config }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// One request per seed, each a copy of `base` with the seed replaced.
    pub fn sweep(base: &BattleConfig, seeds: impl IntoIterator<Item = u32>) -> Vec<Self> {
        seeds
            .into_iter()
            .map(|seed| {
                let request = Self::new(base.clone().with_seed(seed));
                let label = format!("{} #{}", request.label, seed);
                request.with_label(label)
            })
            .collect()
    }
}

/// Outcome of one battle run by the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub id: u64,
    pub label: String,
    pub result: BattleResult,
    /// Hex SHA-256 over the bincode encoding of `result`.
    pub digest: String,
    /// Wall time spent computing, excluding time queued for a slot.
    pub elapsed: Duration,
}

/// Handle to a submitted battle.
#[derive(Debug)]
pub struct BattleTicket {
    pub(crate) id: u64,
    pub(crate) reply: oneshot::Receiver<Result<BattleReport>>,
}

impl BattleTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits for the battle to finish.
    pub async fn wait(self) -> Result<BattleReport> {
        self.reply.await.map_err(RuntimeError::ReplyChannelClosed)?
    }
}
