//! Declarative rule language driving each combatant.
//!
//! A [`RuleProgram`] is an ordered list of `(priority, condition, action)`
//! triples. The language is closed: sixteen conditions and eleven actions.
//! Condition tags that are not recognised parse to [`Condition::Unknown`],
//! which never matches, so a malformed program degrades to the default
//! action instead of failing the battle.

mod interpreter;

pub use interpreter::{choose_action, evaluate, matching_rule};

use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::state::SuperSlot;

// ============================================================================
// Actions
// ============================================================================

/// Move chosen by a combatant for one round.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    #[strum(serialize = "USE_HEAVY_ATTACK")]
    #[cfg_attr(feature = "serde", serde(rename = "USE_HEAVY_ATTACK"))]
    UseHeavyAttack,
    #[strum(serialize = "USE_MEDIUM_ATTACK")]
    #[cfg_attr(feature = "serde", serde(rename = "USE_MEDIUM_ATTACK"))]
    UseMediumAttack,
    #[strum(serialize = "USE_LIGHT_ATTACK")]
    #[cfg_attr(feature = "serde", serde(rename = "USE_LIGHT_ATTACK"))]
    UseLightAttack,
    #[strum(serialize = "USE_SUPER_ATTACK_1")]
    #[cfg_attr(feature = "serde", serde(rename = "USE_SUPER_ATTACK_1"))]
    UseSuperAttack1,
    #[strum(serialize = "USE_SUPER_ATTACK_2")]
    #[cfg_attr(feature = "serde", serde(rename = "USE_SUPER_ATTACK_2"))]
    UseSuperAttack2,
    #[strum(serialize = "FULL_DEFENSE")]
    #[cfg_attr(feature = "serde", serde(rename = "FULL_DEFENSE"))]
    FullDefense,
    #[strum(serialize = "PARTIAL_DEFENSE")]
    #[cfg_attr(feature = "serde", serde(rename = "PARTIAL_DEFENSE"))]
    PartialDefense,
    #[strum(serialize = "HEALING_ROUTINE")]
    #[cfg_attr(feature = "serde", serde(rename = "HEALING_ROUTINE"))]
    HealingRoutine,
    #[strum(serialize = "ELEMENT_BURST")]
    #[cfg_attr(feature = "serde", serde(rename = "ELEMENT_BURST"))]
    ElementBurst,
    #[strum(serialize = "ANALYZE_ENEMY")]
    #[cfg_attr(feature = "serde", serde(rename = "ANALYZE_ENEMY"))]
    AnalyzeEnemy,
    #[strum(serialize = "COUNTER_STANCE")]
    #[cfg_attr(feature = "serde", serde(rename = "COUNTER_STANCE"))]
    CounterStance,
}

impl Action {
    /// Chosen when no rule matches.
    pub const DEFAULT: Action = Action::UseMediumAttack;

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Full or partial defense.
    pub const fn is_defense(self) -> bool {
        matches!(self, Action::FullDefense | Action::PartialDefense)
    }

    /// Actions that deal damage when executed.
    pub const fn is_attack(self) -> bool {
        matches!(
            self,
            Action::UseHeavyAttack
                | Action::UseMediumAttack
                | Action::UseLightAttack
                | Action::UseSuperAttack1
                | Action::UseSuperAttack2
                | Action::ElementBurst
        )
    }

    /// Non-attacking actions put both hit and miss streaks back to zero.
    pub const fn resets_streak(self) -> bool {
        !self.is_attack()
    }

    pub const fn super_slot(self) -> Option<SuperSlot> {
        match self {
            Action::UseSuperAttack1 => Some(SuperSlot::First),
            Action::UseSuperAttack2 => Some(SuperSlot::Second),
            _ => None,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// Predicate evaluated against the battle state from the acting side's
/// point of view. Thresholds come from the owning [`Rule`]'s `value`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Condition {
    MyHpBelow,
    MyHpAbove,
    EnemyHpBelow,
    #[strum(serialize = "ENEMY_HP_ABOVE_80")]
    EnemyHpAbove80,
    EnemyHpDroppingFast,
    MyAttackMovesExhausted,
    EnemyLastMoveWasHeavyAttack,
    EnemyLastMoveWasDefense,
    MyEnergyCritical,
    RoundNumberAbove,
    EnemyElementAdvantage,
    EnemyElementDisadvantage,
    IAmStunned,
    MySuperAvailable,
    ConsecutiveHitsAbove,
    MissStreakAbove,
    /// Any unrecognised tag. Always evaluates to `false`.
    Unknown,
}

impl Condition {
    /// Threshold used by ENEMY_HP_DROPPING_FAST when none is given.
    pub const DEFAULT_DROP_PERCENT: f64 = 15.0;
    /// Threshold used by MY_ENERGY_CRITICAL when none is given.
    pub const DEFAULT_ENERGY_CRITICAL_PERCENT: f64 = 20.0;

    /// Parses a tag, mapping anything unrecognised to [`Condition::Unknown`].
    pub fn parse(tag: &str) -> Self {
        tag.parse().unwrap_or(Condition::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether the condition reads the rule's numeric parameter.
    pub const fn takes_value(self) -> bool {
        matches!(
            self,
            Condition::MyHpBelow
                | Condition::MyHpAbove
                | Condition::EnemyHpBelow
                | Condition::EnemyHpDroppingFast
                | Condition::MyEnergyCritical
                | Condition::RoundNumberAbove
                | Condition::ConsecutiveHitsAbove
                | Condition::MissStreakAbove
        )
    }
}

impl From<String> for Condition {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.as_str().to_owned()
    }
}

impl core::fmt::Display for Condition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Rules
// ============================================================================

/// One `(priority, condition, action)` triple.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    /// Higher priorities are evaluated first.
    pub priority: i32,
    pub condition: Condition,
    /// Numeric threshold for conditions that take one.
    #[cfg_attr(feature = "serde", serde(default, alias = "condition_value"))]
    pub value: Option<f64>,
    pub action: Action,
}

impl Rule {
    pub fn new(priority: i32, condition: Condition, action: Action) -> Self {
        Self {
            priority,
            condition,
            value: None,
            action,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Threshold with absent values read as zero.
    pub fn threshold(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    /// Threshold where both absent and zero fall back to `default`.
    pub fn threshold_or(&self, default: f64) -> f64 {
        match self.value {
            Some(value) if value != 0.0 => value,
            _ => default,
        }
    }
}

/// Rules in evaluation order.
///
/// Sorted once at construction by descending priority. The sort is stable,
/// so rules sharing a priority keep their original relative order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Rule>", into = "Vec<Rule>"))]
pub struct RuleProgram {
    rules: Vec<Rule>,
}

impl RuleProgram {
    pub fn new(mut rules: Vec<Rule>) -> Self {
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { rules }
    }

    /// Program with no rules; always yields [`Action::DEFAULT`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<Rule>> for RuleProgram {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl From<RuleProgram> for Vec<Rule> {
    fn from(program: RuleProgram) -> Self {
        program.rules
    }
}

impl FromIterator<Rule> for RuleProgram {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
