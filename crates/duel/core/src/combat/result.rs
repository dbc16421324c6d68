//! Battle output: round logs, progression events and the final result.

use crate::rules::Action;
use crate::state::{GiftStat, Progression, Side, StatusEffectKind};

/// Something that happened during a round, from `side`'s point of view.
///
/// `Display` renders the predicate only ("uses USE_HEAVY_ATTACK for 42
/// damage"), so callers can prefix whatever name they show for the side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RoundEvent {
    /// BURN or POISON damage at round start.
    StatusTick {
        side: Side,
        kind: StatusEffectKind,
        damage: u32,
    },
    /// The side was stunned and skipped its action.
    Stunned { side: Side },
    /// The side executed an action.
    Acted {
        side: Side,
        chosen: Action,
        action: Action,
        damage: u32,
        healing: u32,
        element_multiplier: f64,
        fallback: bool,
    },
    /// A status was inflicted on `side`.
    StatusApplied {
        side: Side,
        kind: StatusEffectKind,
        duration: u32,
    },
    /// `side`'s counter stance reflected damage onto its attacker.
    Reflected { side: Side, damage: u32 },
    /// A status on `side` wore off.
    StatusExpired { side: Side, kind: StatusEffectKind },
    /// `side` dropped to zero HP.
    KnockedOut { side: Side },
}

impl RoundEvent {
    /// The side the event is about.
    pub fn side(&self) -> Side {
        match self {
            RoundEvent::StatusTick { side, .. }
            | RoundEvent::Stunned { side }
            | RoundEvent::Acted { side, .. }
            | RoundEvent::StatusApplied { side, .. }
            | RoundEvent::Reflected { side, .. }
            | RoundEvent::StatusExpired { side, .. }
            | RoundEvent::KnockedOut { side } => *side,
        }
    }
}

impl core::fmt::Display for RoundEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RoundEvent::StatusTick { kind, damage, .. } => {
                write!(f, "suffers {kind}, losing {damage} HP")
            }
            RoundEvent::Stunned { .. } => f.write_str("is STUNNED and loses the turn"),
            RoundEvent::Acted {
                chosen,
                action,
                damage,
                healing,
                element_multiplier,
                fallback,
                ..
            } => {
                if *fallback {
                    write!(f, "lacks energy for {chosen}, falls back to {action}")?;
                } else {
                    write!(f, "uses {action}")?;
                }
                if *damage > 0 {
                    write!(f, " for {damage} damage (x{element_multiplier:.2})")?;
                }
                if *healing > 0 {
                    write!(f, ", restoring {healing} HP")?;
                }
                Ok(())
            }
            RoundEvent::StatusApplied { kind, duration, .. } => {
                write!(f, "is afflicted with {kind} for {duration} rounds")
            }
            RoundEvent::Reflected { damage, .. } => {
                write!(f, "counters, reflecting {damage} damage")
            }
            RoundEvent::StatusExpired { kind, .. } => write!(f, "recovers from {kind}"),
            RoundEvent::KnockedOut { .. } => f.write_str("is knocked out"),
        }
    }
}

/// Log of one round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundLog {
    pub round: u32,
    pub events: Vec<RoundEvent>,
    /// HP of side one and side two at round end.
    pub hp_after: [u32; 2],
    /// Actions selected by each side; `None` when stunned or when the round
    /// ended during the status tick.
    pub actions: [Option<Action>; 2],
    /// Side holding the speed advantage; `None` when no action phase ran.
    pub speed_advantage: Option<Side>,
    /// Generator state at round end, for checkpointing a replay.
    pub rng_state: u32,
}

/// A stat gift granted after a kill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatGiftEvent {
    pub side: Side,
    pub combatant: String,
    pub stat: GiftStat,
    pub amount: u32,
    /// Total kills at the time of the gift.
    pub kill_milestone: u32,
    pub round: u32,
}

/// An evolution stage reached after a kill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionEvent {
    pub side: Side,
    pub combatant: String,
    pub new_stage: u8,
    /// Milestone that triggered the stage.
    pub kill_milestone: u32,
    pub round: u32,
}

impl EvolutionEvent {
    /// Flavour line for the stage reached.
    pub fn narrative(&self) -> &'static str {
        match self.new_stage {
            1 => "sparks with newfound power",
            2 => "overclocks its core",
            3 => "transforms its chassis",
            4 => "transcends its limits",
            _ => "evolves",
        }
    }
}

/// Final, self-contained outcome of one battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    /// Winner id; `None` on a draw.
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub winner_side: Option<Side>,
    pub rounds: u32,
    pub turns: Vec<RoundLog>,
    pub side_one_final_hp_pct: f64,
    pub side_two_final_hp_pct: f64,
    /// Id of the side that delivered the finishing blow; `None` on timeout
    /// or double knockout.
    pub knockout_by: Option<String>,
    pub stat_gifts: Vec<StatGiftEvent>,
    pub evolutions: Vec<EvolutionEvent>,
    /// Career progression of both sides after the battle, for persistence.
    pub final_progression: [Progression; 2],
    pub seed: u32,
}

impl BattleResult {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    pub fn final_hp_pct(&self, side: Side) -> f64 {
        match side {
            Side::One => self.side_one_final_hp_pct,
            Side::Two => self.side_two_final_hp_pct,
        }
    }

    /// SHA-256 over the bincode encoding of the whole result.
    ///
    /// Two runs of the same configuration produce the same digest, so a
    /// stored digest is enough to verify a replay.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hasher.finalize().into())
    }
}

/// Expected and recomputed digests of a replayed battle.
#[cfg(feature = "serde")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayCheck {
    pub expected: [u8; 32],
    pub actual: [u8; 32],
}

#[cfg(feature = "serde")]
impl ReplayCheck {
    pub fn is_match(&self) -> bool {
        self.expected == self.actual
    }
}

/// Re-runs `config` and compares the result digest against `expected`.
#[cfg(feature = "serde")]
pub fn verify_replay(
    config: &crate::config::BattleConfig,
    expected: [u8; 32],
) -> Result<ReplayCheck, crate::error::ReplayError> {
    let result = super::run_battle(config)?;
    Ok(ReplayCheck {
        expected,
        actual: result.digest()?,
    })
}
