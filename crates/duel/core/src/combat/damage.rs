//! Damage arithmetic.
//!
//! All values are rounded half away from zero at each documented step, so
//! the sequence of roundings is part of the result.

use crate::config::{DamageTable, StanceTable};
use crate::rng::RandomSource;
use crate::rules::Action;

// ============================================================================
// Damage Calculation
// ============================================================================

/// Base damage of one attack.
///
/// # Formula
///
/// ```text
/// effective_element = max(element_floor, element_multiplier)
/// raw = attack * action_multiplier * effective_element * variance
///       - defense * defense_factor
/// damage = round(max(1, raw))
/// ```
pub fn base_damage(
    attack: u32,
    defense: u32,
    action_multiplier: f64,
    element_multiplier: f64,
    variance: f64,
    table: &DamageTable,
) -> u32 {
    let effective_element = element_multiplier.max(table.element_floor);
    let raw = f64::from(attack) * action_multiplier * effective_element * variance
        - f64::from(defense) * table.defense_factor;
    raw.max(1.0).round() as u32
}

/// Draws the variance factor `1 + uniform(-variance, variance)`.
pub fn roll_variance(rng: &mut impl RandomSource, table: &DamageTable) -> f64 {
    1.0 + rng.next_float(-table.variance, table.variance)
}

/// Applies the slow-side penalty. The side holding the speed advantage
/// keeps its damage unchanged.
pub fn speed_scaled(damage: u32, has_speed_advantage: bool, table: &DamageTable) -> u32 {
    if has_speed_advantage {
        return damage;
    }
    (f64::from(damage) * (1.0 - table.speed_penalty)).round() as u32
}

/// Reduction granted by the target's previous-round stance, if any.
pub fn stance_reduction(stance: Option<Action>, table: &StanceTable) -> Option<f64> {
    match stance {
        Some(Action::FullDefense) => Some(table.full_defense_reduction),
        Some(Action::PartialDefense) => Some(table.partial_defense_reduction),
        _ => None,
    }
}

/// Applies a defensive stance. Never reduces damage below 1.
pub fn stance_mitigated(damage: u32, stance: Option<Action>, table: &StanceTable) -> u32 {
    match stance_reduction(stance, table) {
        Some(reduction) => ((f64::from(damage) * (1.0 - reduction)).round() as u32).max(1),
        None => damage,
    }
}

/// Damage reflected by a counter stance.
pub fn reflected(damage: u32, table: &StanceTable) -> u32 {
    (f64::from(damage) * table.counter_reflect).round() as u32
}

/// Periodic status damage: `round(max_hp * fraction)`.
pub fn tick_damage(max_hp: u32, fraction: f64) -> u32 {
    (f64::from(max_hp) * fraction).round() as u32
}
