//! Aggregate statistics over many battles of the same matchup.

use serde::{Deserialize, Serialize};

use duel_core::Side;

use crate::api::BattleReport;

/// Win/draw tally over a set of reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub battles: u32,
    /// Wins by side one and side two.
    pub wins: [u32; 2],
    pub draws: u32,
    pub knockouts: u32,
    /// Battles that reached the round cap with both sides standing.
    pub timeouts: u32,
    pub total_rounds: u64,
    pub longest: u32,
}

impl SweepSummary {
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a BattleReport>) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.record(report);
        }
        summary
    }

    pub fn record(&mut self, report: &BattleReport) {
        let result = &report.result;
        self.battles += 1;
        match result.winner_side {
            Some(side) => self.wins[side.index()] += 1,
            None => self.draws += 1,
        }
        if result.knockout_by.is_some() {
            self.knockouts += 1;
        } else if result.side_one_final_hp_pct > 0.0 && result.side_two_final_hp_pct > 0.0 {
            self.timeouts += 1;
        }
        self.total_rounds += u64::from(result.rounds);
        self.longest = self.longest.max(result.rounds);
    }

    pub fn win_rate(&self, side: Side) -> f64 {
        if self.battles == 0 {
            0.0
        } else {
            f64::from(self.wins[side.index()]) / f64::from(self.battles)
        }
    }

    pub fn avg_rounds(&self) -> f64 {
        if self.battles == 0 {
            0.0
        } else {
            self.total_rounds as f64 / f64::from(self.battles)
        }
    }
}
