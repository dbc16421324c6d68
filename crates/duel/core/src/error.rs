//! Error types for duel-core.
//!
//! The engine has no I/O, so the taxonomy is small. Malformed rule programs
//! and insufficient energy are never errors: they degrade to default or
//! fallback actions inside the resolver. Only precondition violations that
//! make a simulation meaningless are surfaced, and always before the first
//! round runs.

/// A battle configuration that violates the resolver's preconditions.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BattleSetupError {
    #[error("combatant '{0}' has zero max HP")]
    ZeroMaxHp(String),

    #[error("combatant '{0}' has zero energy capacity")]
    ZeroEnergyCapacity(String),

    #[error("round cap must be at least 1")]
    ZeroRoundCap,

    #[error("multiplier '{name}' is invalid: {value}")]
    InvalidMultiplier {
        name: &'static str,
        value: f64,
    },

    #[error("combatant '{combatant}' super '{ability}' has status chance {chance} outside [0, 1]")]
    InvalidStatusChance {
        combatant: String,
        ability: String,
        chance: f64,
    },

    #[error("gift interval {min}..={max} is empty")]
    InvalidGiftInterval { min: u32, max: u32 },

    #[error("both combatants share the id '{0}'")]
    DuplicateCombatantId(String),
}

impl BattleSetupError {
    /// Stable identifier for this error variant, suitable for logs and
    /// metrics.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroMaxHp(_) => "zero_max_hp",
            Self::ZeroEnergyCapacity(_) => "zero_energy_capacity",
            Self::ZeroRoundCap => "zero_round_cap",
            Self::InvalidMultiplier { .. } => "invalid_multiplier",
            Self::InvalidStatusChance { .. } => "invalid_status_chance",
            Self::InvalidGiftInterval { .. } => "invalid_gift_interval",
            Self::DuplicateCombatantId(_) => "duplicate_combatant_id",
        }
    }
}

/// Failure while fingerprinting or verifying a replay.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("battle configuration rejected: {0}")]
    Setup(#[from] BattleSetupError),

    #[error("failed to encode battle result: {0}")]
    Encode(#[from] bincode::Error),
}
