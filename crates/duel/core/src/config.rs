//! Balance tables and battle configuration.
//!
//! Every numeric constant the resolver applies lives in [`BalanceTable`]. The
//! defaults are the shipped balance; the values are configuration while their
//! point of application is fixed by the engine.

use crate::element::ElementMatrix;
use crate::error::BattleSetupError;
use crate::rules::RuleProgram;
use crate::state::{CombatantDefinition, Side};

/// Default round cap.
pub const DEFAULT_ROUND_CAP: u32 = 50;

/// Size of the per-combatant HP history window.
pub const HP_HISTORY_WINDOW: usize = 3;

/// Damage multipliers for plain attacks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionMultipliers {
    pub heavy: f64,
    pub medium: f64,
    pub light: f64,
    pub element_burst: f64,
}

impl Default for ActionMultipliers {
    fn default() -> Self {
        Self {
            heavy: 1.8,
            medium: 1.0,
            light: 0.6,
            element_burst: 1.4,
        }
    }
}

/// Parameters of the damage formula.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageTable {
    /// Lower bound applied to the matrix multiplier.
    pub element_floor: f64,
    /// Variance half-width: damage is scaled by `1 ± variance`.
    pub variance: f64,
    /// Fraction of the defender's defense subtracted from raw damage.
    pub defense_factor: f64,
    /// Damage reduction for the side without the round's speed advantage.
    pub speed_penalty: f64,
}

impl Default for DamageTable {
    fn default() -> Self {
        Self {
            element_floor: 0.70,
            variance: 0.10,
            defense_factor: 0.5,
            speed_penalty: 0.10,
        }
    }
}

/// Defensive stance parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StanceTable {
    pub full_defense_reduction: f64,
    pub partial_defense_reduction: f64,
    pub counter_reflect: f64,
}

impl Default for StanceTable {
    fn default() -> Self {
        Self {
            full_defense_reduction: 0.85,
            partial_defense_reduction: 0.45,
            counter_reflect: 0.30,
        }
    }
}

/// Status effect rates, chances and durations.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusTable {
    pub burn_tick: f64,
    pub poison_tick: f64,
    pub burst_chance: f64,
    pub burst_duration: u32,
    pub heavy_stun_chance: f64,
    pub heavy_stun_duration: u32,
    pub super_duration: u32,
}

impl Default for StatusTable {
    fn default() -> Self {
        Self {
            burn_tick: 0.05,
            poison_tick: 0.03,
            burst_chance: 0.35,
            burst_duration: 2,
            heavy_stun_chance: 0.10,
            heavy_stun_duration: 1,
            super_duration: 2,
        }
    }
}

/// Healing routine range, as fractions of max HP.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HealTable {
    pub min: f64,
    pub spread: f64,
}

impl Default for HealTable {
    fn default() -> Self {
        Self {
            min: 0.12,
            spread: 0.06,
        }
    }
}

/// Stat gift cadence and amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GiftTable {
    pub interval_min: u32,
    pub interval_max: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl Default for GiftTable {
    fn default() -> Self {
        Self {
            interval_min: 3,
            interval_max: 4,
            hp: 50,
            attack: 5,
            defense: 3,
            speed: 2,
        }
    }
}

/// Evolution milestones and per-stage bonuses.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvolutionTable {
    pub milestones: [u32; 4],
    pub attack_per_stage: f64,
    pub defense_per_stage: f64,
}

impl Default for EvolutionTable {
    fn default() -> Self {
        Self {
            milestones: [3, 10, 25, 50],
            attack_per_stage: 0.05,
            defense_per_stage: 0.03,
        }
    }
}

/// Complete balance configuration of the resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceTable {
    pub actions: ActionMultipliers,
    pub elements: ElementMatrix,
    pub damage: DamageTable,
    pub stances: StanceTable,
    pub status: StatusTable,
    pub heal: HealTable,
    pub gifts: GiftTable,
    pub evolution: EvolutionTable,
    /// Fraction of energy capacity a combatant starts with.
    pub starting_energy: f64,
}

impl BalanceTable {
    pub const DEFAULT_STARTING_ENERGY: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            actions: ActionMultipliers::default(),
            elements: ElementMatrix::default(),
            damage: DamageTable::default(),
            stances: StanceTable::default(),
            status: StatusTable::default(),
            heal: HealTable::default(),
            gifts: GiftTable::default(),
            evolution: EvolutionTable::default(),
            starting_energy: Self::DEFAULT_STARTING_ENERGY,
        }
    }

    /// Rejects non-finite or negative multipliers, fractions above one, and
    /// an inverted gift interval.
    pub fn validate(&self) -> Result<(), BattleSetupError> {
        let non_negative = [
            ("actions.heavy", self.actions.heavy),
            ("actions.medium", self.actions.medium),
            ("actions.light", self.actions.light),
            ("actions.element_burst", self.actions.element_burst),
            ("elements.advantage", self.elements.advantage),
            ("elements.disadvantage", self.elements.disadvantage),
            ("damage.element_floor", self.damage.element_floor),
            ("damage.defense_factor", self.damage.defense_factor),
            ("evolution.attack_per_stage", self.evolution.attack_per_stage),
            ("evolution.defense_per_stage", self.evolution.defense_per_stage),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(BattleSetupError::InvalidMultiplier { name, value });
            }
        }

        let fractions = [
            ("damage.variance", self.damage.variance),
            ("damage.speed_penalty", self.damage.speed_penalty),
            ("stances.full_defense_reduction", self.stances.full_defense_reduction),
            ("stances.partial_defense_reduction", self.stances.partial_defense_reduction),
            ("stances.counter_reflect", self.stances.counter_reflect),
            ("status.burn_tick", self.status.burn_tick),
            ("status.poison_tick", self.status.poison_tick),
            ("status.burst_chance", self.status.burst_chance),
            ("status.heavy_stun_chance", self.status.heavy_stun_chance),
            ("heal.min", self.heal.min),
            ("heal.spread", self.heal.spread),
            ("starting_energy", self.starting_energy),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(BattleSetupError::InvalidMultiplier { name, value });
            }
        }

        if self.gifts.interval_min == 0 || self.gifts.interval_min > self.gifts.interval_max {
            return Err(BattleSetupError::InvalidGiftInterval {
                min: self.gifts.interval_min,
                max: self.gifts.interval_max,
            });
        }

        Ok(())
    }
}

impl Default for BalanceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one battle needs: seed, both combatants and their programs.
///
/// Index 0 of each pair is [`Side::One`], index 1 is [`Side::Two`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    pub seed: u32,
    pub combatants: [CombatantDefinition; 2],
    pub programs: [RuleProgram; 2],
    pub round_cap: u32,
    pub balance: BalanceTable,
}

impl BattleConfig {
    pub fn new(
        seed: u32,
        one: CombatantDefinition,
        two: CombatantDefinition,
        program_one: RuleProgram,
        program_two: RuleProgram,
    ) -> Self {
        Self {
            seed,
            combatants: [one, two],
            programs: [program_one, program_two],
            round_cap: DEFAULT_ROUND_CAP,
            balance: BalanceTable::new(),
        }
    }

    #[must_use]
    pub fn with_round_cap(mut self, round_cap: u32) -> Self {
        self.round_cap = round_cap;
        self
    }

    #[must_use]
    pub fn with_balance(mut self, balance: BalanceTable) -> Self {
        self.balance = balance;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn combatant(&self, side: Side) -> &CombatantDefinition {
        &self.combatants[side.index()]
    }

    pub fn program(&self, side: Side) -> &RuleProgram {
        &self.programs[side.index()]
    }

    /// Checks the preconditions the resolver relies on. Only programmer
    /// errors fail here; malformed rule programs never do.
    pub fn validate(&self) -> Result<(), BattleSetupError> {
        if self.round_cap == 0 {
            return Err(BattleSetupError::ZeroRoundCap);
        }
        self.balance.validate()?;
        for definition in &self.combatants {
            definition.validate()?;
        }
        if self.combatants[0].id == self.combatants[1].id {
            return Err(BattleSetupError::DuplicateCombatantId(
                self.combatants[0].id.clone(),
            ));
        }
        Ok(())
    }
}
