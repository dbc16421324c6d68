//! Combatant definitions (immutable input) and per-battle combatant state.

use arrayvec::ArrayVec;
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::config::{BalanceTable, HP_HISTORY_WINDOW};
use crate::element::Element;
use crate::error::BattleSetupError;
use crate::rules::Action;

use super::status::{MAX_STATUS_EFFECTS, StatusEffectKind, StatusEffects};

// ============================================================================
// Definition
// ============================================================================

/// Energy-gated special attack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuperAttack {
    pub name: String,
    /// Replaces the plain action multiplier in the damage formula.
    pub damage_multiplier: f64,
    pub energy_cost: u32,
    /// Status inflicted on the target when the chance roll succeeds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusEffectKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_chance: f64,
}

impl SuperAttack {
    pub fn new(name: impl Into<String>, damage_multiplier: f64, energy_cost: u32) -> Self {
        Self {
            name: name.into(),
            damage_multiplier,
            energy_cost,
            status: None,
            status_chance: 0.0,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusEffectKind, chance: f64) -> Self {
        self.status = Some(status);
        self.status_chance = chance;
        self
    }

    /// Status and chance, when this super can inflict anything at all.
    pub fn status_roll(&self) -> Option<(StatusEffectKind, f64)> {
        match self.status {
            Some(kind) if self.status_chance > 0.0 => Some((kind, self.status_chance)),
            _ => None,
        }
    }
}

/// Passive trait descriptor. Carried through to results; the resolver does
/// not interpret it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveTrait {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Free-form tag such as `LIFESTEAL` or `COUNTER_ON_BLOCK`.
    #[cfg_attr(feature = "serde", serde(alias = "trait_type"))]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: f64,
}

impl PassiveTrait {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: kind.into(),
            value,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Career progression carried into a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Progression {
    pub total_kills: u32,
    pub evolution_stage: u8,
    pub kills_since_last_gift: u32,
}

/// Immutable description of a combatant, supplied by the caller.
///
/// Base stats already include any evolution earned before the battle; the
/// carried [`Progression`] only seeds the kill counters and the stage used
/// for further milestones.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantDefinition {
    pub id: String,
    pub name: String,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub energy_capacity: u32,
    /// Energy regained at the end of each acting round.
    pub energy_regen: u32,
    pub element: Element,
    pub super_attack_1: SuperAttack,
    pub super_attack_2: SuperAttack,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive: PassiveTrait,
    /// Rarity tier (1-5). Informational.
    #[cfg_attr(feature = "serde", serde(default = "default_tier"))]
    pub tier: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub progression: Progression,
}

#[cfg(feature = "serde")]
fn default_tier() -> u8 {
    1
}

impl CombatantDefinition {
    /// Definition with baseline stats, to be refined with the `with_*`
    /// setters.
    pub fn new(id: impl Into<String>, element: Element) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            hp: 1000,
            attack: 100,
            defense: 50,
            speed: 50,
            energy_capacity: 100,
            energy_regen: 8,
            element,
            super_attack_1: SuperAttack::new("Overdrive", 2.2, 50),
            super_attack_2: SuperAttack::new("Core Breach", 3.0, 80),
            passive: PassiveTrait::default(),
            tier: 1,
            progression: Progression::default(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_stats(mut self, hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        self.hp = hp;
        self.attack = attack;
        self.defense = defense;
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, capacity: u32, regen: u32) -> Self {
        self.energy_capacity = capacity;
        self.energy_regen = regen;
        self
    }

    #[must_use]
    pub fn with_supers(mut self, first: SuperAttack, second: SuperAttack) -> Self {
        self.super_attack_1 = first;
        self.super_attack_2 = second;
        self
    }

    #[must_use]
    pub fn with_passive(mut self, passive: PassiveTrait) -> Self {
        self.passive = passive;
        self
    }

    #[must_use]
    pub fn with_tier(mut self, tier: u8) -> Self {
        self.tier = tier;
        self
    }

    #[must_use]
    pub fn with_progression(mut self, progression: Progression) -> Self {
        self.progression = progression;
        self
    }

    pub fn super_attack(&self, slot: SuperSlot) -> &SuperAttack {
        match slot {
            SuperSlot::First => &self.super_attack_1,
            SuperSlot::Second => &self.super_attack_2,
        }
    }

    pub fn validate(&self) -> Result<(), BattleSetupError> {
        if self.hp == 0 {
            return Err(BattleSetupError::ZeroMaxHp(self.id.clone()));
        }
        if self.energy_capacity == 0 {
            return Err(BattleSetupError::ZeroEnergyCapacity(self.id.clone()));
        }
        for ability in [&self.super_attack_1, &self.super_attack_2] {
            let multiplier = ability.damage_multiplier;
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(BattleSetupError::InvalidMultiplier {
                    name: "super_attack.damage_multiplier",
                    value: multiplier,
                });
            }
            let chance = ability.status_chance;
            if !chance.is_finite() || !(0.0..=1.0).contains(&chance) {
                return Err(BattleSetupError::InvalidStatusChance {
                    combatant: self.id.clone(),
                    ability: ability.name.clone(),
                    chance,
                });
            }
        }
        Ok(())
    }
}

/// Which of the two super attacks an action refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuperSlot {
    First,
    Second,
}

// ============================================================================
// Gifts
// ============================================================================

/// Stat raised by a gift.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GiftStat {
    #[strum(serialize = "HP")]
    #[cfg_attr(feature = "serde", serde(rename = "HP"))]
    Hp,
    #[strum(serialize = "ATK")]
    #[cfg_attr(feature = "serde", serde(rename = "ATK"))]
    Attack,
    #[strum(serialize = "DEF")]
    #[cfg_attr(feature = "serde", serde(rename = "DEF"))]
    Defense,
    #[strum(serialize = "SPD")]
    #[cfg_attr(feature = "serde", serde(rename = "SPD"))]
    Speed,
}

impl GiftStat {
    /// Draw order: index `i` of a uniform `[0, 3]` draw selects `ALL[i]`.
    pub const ALL: [GiftStat; 4] = [
        GiftStat::Hp,
        GiftStat::Attack,
        GiftStat::Defense,
        GiftStat::Speed,
    ];

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl core::fmt::Display for GiftStat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permanent additive bonuses accumulated through stat gifts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatGifts {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl StatGifts {
    pub fn get(&self, stat: GiftStat) -> u32 {
        match stat {
            GiftStat::Hp => self.hp,
            GiftStat::Attack => self.attack,
            GiftStat::Defense => self.defense,
            GiftStat::Speed => self.speed,
        }
    }

    pub fn add(&mut self, stat: GiftStat, amount: u32) {
        let slot = match stat {
            GiftStat::Hp => &mut self.hp,
            GiftStat::Attack => &mut self.attack,
            GiftStat::Defense => &mut self.defense,
            GiftStat::Speed => &mut self.speed,
        };
        *slot = slot.saturating_add(amount);
    }
}

// ============================================================================
// HP history
// ============================================================================

/// Sliding window of the most recent end-of-round HP values, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HpHistory {
    entries: ArrayVec<u32, HP_HISTORY_WINDOW>,
}

impl HpHistory {
    /// Window containing only the starting HP.
    pub fn seeded(hp: u32) -> Self {
        let mut entries = ArrayVec::new();
        entries.push(hp);
        Self { entries }
    }

    /// Appends a value, evicting the oldest once the window is full.
    pub fn push(&mut self, hp: u32) {
        if self.entries.is_full() {
            self.entries.remove(0);
        }
        self.entries.push(hp);
    }

    pub fn oldest(&self) -> Option<u32> {
        self.entries.first().copied()
    }

    pub fn newest(&self) -> Option<u32> {
        self.entries.last().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.entries
    }
}

// ============================================================================
// Battle state
// ============================================================================

/// Mutable per-battle state of one combatant.
///
/// HP never exceeds [`max_hp`](Self::max_hp) and energy never exceeds the
/// definition's capacity; every mutator clamps.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub definition: CombatantDefinition,
    pub current_hp: u32,
    pub current_energy: u32,
    pub current_speed: u32,
    /// Evolved attack, excluding gifts.
    pub attack: u32,
    /// Evolved defense, excluding gifts.
    pub defense: u32,
    pub status: StatusEffects,
    pub last_action: Option<Action>,
    pub consecutive_hits: u32,
    pub miss_streak: u32,
    pub hp_history: HpHistory,
    pub gifts: StatGifts,
    pub total_kills: u32,
    pub evolution_stage: u8,
    pub kills_since_last_gift: u32,
    /// Kills required for the next gift; drawn by the resolver.
    pub next_gift_interval: u32,
}

impl CombatantState {
    /// Fresh state at battle start: full HP, starting energy, no statuses.
    pub fn new(definition: CombatantDefinition, balance: &BalanceTable) -> Self {
        let current_energy =
            (f64::from(definition.energy_capacity) * balance.starting_energy).floor() as u32;
        let progression = definition.progression;
        Self {
            current_hp: definition.hp,
            current_energy,
            current_speed: definition.speed,
            attack: definition.attack,
            defense: definition.defense,
            status: StatusEffects::empty(),
            last_action: None,
            consecutive_hits: 0,
            miss_streak: 0,
            hp_history: HpHistory::seeded(definition.hp),
            gifts: StatGifts::default(),
            total_kills: progression.total_kills,
            evolution_stage: progression.evolution_stage,
            kills_since_last_gift: progression.kills_since_last_gift,
            next_gift_interval: balance.gifts.interval_min,
            definition,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn element(&self) -> Element {
        self.definition.element
    }

    pub fn max_hp(&self) -> u32 {
        self.definition.hp.saturating_add(self.gifts.hp)
    }

    pub fn max_energy(&self) -> u32 {
        self.definition.energy_capacity
    }

    /// `current_hp / max_hp * 100`.
    pub fn hp_percent(&self) -> f64 {
        f64::from(self.current_hp) / f64::from(self.max_hp()) * 100.0
    }

    pub fn energy_percent(&self) -> f64 {
        f64::from(self.current_energy) / f64::from(self.max_energy()) * 100.0
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Attack used by the damage formula: evolved attack plus gifts.
    pub fn effective_attack(&self) -> u32 {
        self.attack.saturating_add(self.gifts.attack)
    }

    /// Defense used by the damage formula: evolved defense plus gifts.
    pub fn effective_defense(&self) -> u32 {
        self.defense.saturating_add(self.gifts.defense)
    }

    /// Speed without any FREEZE penalty.
    pub fn base_speed(&self) -> u32 {
        self.definition.speed.saturating_add(self.gifts.speed)
    }

    pub fn has_status(&self, kind: StatusEffectKind) -> bool {
        self.status.has(kind)
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current_energy >= cost
    }

    /// Subtracts damage, saturating at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restores HP up to the maximum. Returns the HP actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += gained;
        gained
    }

    /// Pays `cost` then regenerates `regen`, clamped to `[0, capacity]`.
    pub fn settle_energy(&mut self, cost: u32, regen: u32) {
        self.current_energy = self
            .current_energy
            .saturating_sub(cost)
            .saturating_add(regen)
            .min(self.max_energy());
    }

    /// Inflicts a status. A fresh FREEZE halves current speed (minimum 1).
    pub fn inflict(&mut self, kind: StatusEffectKind, duration: u32, round: u32) {
        let fresh = self.status.apply(kind, duration, round);
        if fresh && kind == StatusEffectKind::Freeze {
            self.current_speed = (self.current_speed / 2).max(1);
        }
    }

    /// Ages statuses for the end of `round`. FREEZE expiry restores speed to
    /// base plus gifts.
    pub fn decay_statuses(
        &mut self,
        round: u32,
    ) -> ArrayVec<StatusEffectKind, MAX_STATUS_EFFECTS> {
        let expired = self.status.decay(round);
        if expired.contains(&StatusEffectKind::Freeze) {
            self.current_speed = self.base_speed();
        }
        expired
    }

    /// Updates the hit and miss streaks for an executed action.
    pub fn record_outcome(&mut self, action: Action, damage_dealt: u32) {
        if damage_dealt > 0 {
            self.consecutive_hits += 1;
            self.miss_streak = 0;
        } else if action.resets_streak() {
            self.consecutive_hits = 0;
            self.miss_streak = 0;
        } else {
            self.miss_streak += 1;
            self.consecutive_hits = 0;
        }
    }
}
