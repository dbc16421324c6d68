//! Read-only computation of each side's action consequences.
//!
//! A [`PendingAction`] is computed for both sides before any HP or energy
//! changes, which is what makes damage resolution simultaneous. Generator
//! draws happen here, in a fixed order per side: variance first, then the
//! status roll (burst, heavy stun or super) or the heal draw.

use crate::config::BalanceTable;
use crate::element::Element;
use crate::rng::RandomSource;
use crate::rules::Action;
use crate::state::{CombatantState, Side, StatusEffectKind};

use super::damage::{base_damage, roll_variance, speed_scaled, stance_mitigated};

/// Status an element inflicts through ELEMENT_BURST.
pub const fn burst_status(element: Element) -> StatusEffectKind {
    match element {
        Element::Volt | Element::Iron => StatusEffectKind::Stun,
        Element::Cryo => StatusEffectKind::Freeze,
        Element::Pyro => StatusEffectKind::Burn,
        Element::Nano | Element::Void => StatusEffectKind::Poison,
    }
}

/// Status to inflict on the target, with its duration in rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Infliction {
    pub kind: StatusEffectKind,
    pub duration: u32,
}

/// Fully computed, not yet applied, consequence of one side's action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingAction {
    pub side: Side,
    /// Action the rule program selected.
    pub chosen: Action,
    /// Action actually executed; differs from `chosen` on fallback.
    pub action: Action,
    pub damage: u32,
    pub healing: u32,
    pub energy_cost: u32,
    pub energy_regen: u32,
    pub inflict: Option<Infliction>,
    /// Matrix multiplier of actor element against target element.
    pub element_multiplier: f64,
    /// A super was chosen without enough energy and became a medium attack.
    pub fallback: bool,
}

impl PendingAction {
    fn idle(side: Side, action: Action, actor: &CombatantState, element_multiplier: f64) -> Self {
        Self {
            side,
            chosen: action,
            action,
            damage: 0,
            healing: 0,
            energy_cost: 0,
            energy_regen: actor.definition.energy_regen,
            inflict: None,
            element_multiplier,
            fallback: false,
        }
    }
}

/// Inputs shared by both sides' computations in one round.
#[derive(Clone, Copy, Debug)]
pub struct PendingContext<'a> {
    pub balance: &'a BalanceTable,
    /// Target's action from the previous round, used for stance reduction.
    pub target_stance: Option<Action>,
    pub has_speed_advantage: bool,
}

/// Computes the pending consequence of `action` for `side`.
///
/// Never mutates state. Consumes generator draws only for attacks (variance,
/// then any status roll) and heals (one draw).
pub fn compute_pending(
    side: Side,
    actor: &CombatantState,
    target: &CombatantState,
    action: Action,
    ctx: PendingContext<'_>,
    rng: &mut impl RandomSource,
) -> PendingAction {
    let balance = ctx.balance;
    let element_multiplier = balance.elements.multiplier(actor.element(), target.element());
    let mut pending = PendingAction::idle(side, action, actor, element_multiplier);

    let strike = |multiplier: f64, variance: f64| -> u32 {
        let damage = base_damage(
            actor.effective_attack(),
            target.effective_defense(),
            multiplier,
            element_multiplier,
            variance,
            &balance.damage,
        );
        let damage = speed_scaled(damage, ctx.has_speed_advantage, &balance.damage);
        stance_mitigated(damage, ctx.target_stance, &balance.stances)
    };

    match action {
        Action::UseHeavyAttack
        | Action::UseMediumAttack
        | Action::UseLightAttack
        | Action::ElementBurst => {
            let multiplier = match action {
                Action::UseHeavyAttack => balance.actions.heavy,
                Action::UseLightAttack => balance.actions.light,
                Action::ElementBurst => balance.actions.element_burst,
                _ => balance.actions.medium,
            };
            pending.damage = strike(multiplier, roll_variance(rng, &balance.damage));

            let status = &balance.status;
            if action == Action::ElementBurst && rng.chance(status.burst_chance) {
                pending.inflict = Some(Infliction {
                    kind: burst_status(actor.element()),
                    duration: status.burst_duration,
                });
            }
            if action == Action::UseHeavyAttack && rng.chance(status.heavy_stun_chance) {
                pending.inflict = Some(Infliction {
                    kind: StatusEffectKind::Stun,
                    duration: status.heavy_stun_duration,
                });
            }
        }
        Action::UseSuperAttack1 | Action::UseSuperAttack2 => {
            let slot = match action.super_slot() {
                Some(slot) => slot,
                None => return pending,
            };
            let ability = actor.definition.super_attack(slot);
            if !actor.can_afford(ability.energy_cost) {
                let mut fallback = compute_pending(
                    side,
                    actor,
                    target,
                    Action::UseMediumAttack,
                    ctx,
                    rng,
                );
                fallback.chosen = action;
                fallback.fallback = true;
                return fallback;
            }

            pending.damage = strike(
                ability.damage_multiplier,
                roll_variance(rng, &balance.damage),
            );
            pending.energy_cost = ability.energy_cost;
            if let Some((kind, chance)) = ability.status_roll() {
                if rng.chance(chance) {
                    pending.inflict = Some(Infliction {
                        kind,
                        duration: balance.status.super_duration,
                    });
                }
            }
        }
        Action::HealingRoutine => {
            let fraction = balance.heal.min + rng.next_f64() * balance.heal.spread;
            pending.healing = (f64::from(actor.max_hp()) * fraction).round() as u32;
        }
        Action::FullDefense
        | Action::PartialDefense
        | Action::AnalyzeEnemy
        | Action::CounterStance => {}
    }

    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Lcg;
    use crate::state::{BattleState, CombatantDefinition, SuperAttack};

    fn battle() -> BattleState {
        let one = CombatantDefinition::new("one", Element::Pyro)
            .with_stats(500, 80, 20, 30)
            .with_energy(100, 8)
            .with_supers(
                SuperAttack::new("Flare", 2.5, 40).with_status(StatusEffectKind::Burn, 1.0),
                SuperAttack::new("Nova", 3.5, 90),
            );
        let two = CombatantDefinition::new("two", Element::Nano).with_stats(500, 60, 40, 20);
        BattleState::new(one, two, &BalanceTable::new())
    }

    fn ctx(balance: &BalanceTable) -> PendingContext<'_> {
        PendingContext {
            balance,
            target_stance: None,
            has_speed_advantage: true,
        }
    }

    #[test]
    fn super_without_energy_falls_back_to_medium() {
        let state = battle();
        let balance = BalanceTable::new();
        let (actor, target) = state.actor_and_opponent(Side::One);

        let mut rng = Lcg::new(9);
        let pending = compute_pending(
            Side::One,
            actor,
            target,
            Action::UseSuperAttack2,
            ctx(&balance),
            &mut rng,
        );
        assert!(pending.fallback);
        assert_eq!(pending.chosen, Action::UseSuperAttack2);
        assert_eq!(pending.action, Action::UseMediumAttack);
        assert_eq!(pending.energy_cost, 0);

        // Same draws as a plain medium attack.
        let mut rng = Lcg::new(9);
        let medium = compute_pending(
            Side::One,
            actor,
            target,
            Action::UseMediumAttack,
            ctx(&balance),
            &mut rng,
        );
        assert_eq!(pending.damage, medium.damage);
        assert!(!medium.fallback);
    }

    #[test]
    fn affordable_super_charges_energy_and_rolls_status() {
        let state = battle();
        let balance = BalanceTable::new();
        let (actor, target) = state.actor_and_opponent(Side::One);
        let mut rng = Lcg::new(1);
        let pending = compute_pending(
            Side::One,
            actor,
            target,
            Action::UseSuperAttack1,
            ctx(&balance),
            &mut rng,
        );
        assert!(!pending.fallback);
        assert_eq!(pending.energy_cost, 40);
        assert_eq!(
            pending.inflict,
            Some(Infliction {
                kind: StatusEffectKind::Burn,
                duration: 2
            })
        );
        // PYRO beats NANO.
        assert_eq!(pending.element_multiplier, 1.1);
    }

    #[test]
    fn non_damaging_actions_consume_no_draws() {
        let state = battle();
        let balance = BalanceTable::new();
        let (actor, target) = state.actor_and_opponent(Side::One);
        for action in [
            Action::FullDefense,
            Action::PartialDefense,
            Action::AnalyzeEnemy,
            Action::CounterStance,
        ] {
            let mut rng = Lcg::new(5);
            let pending = compute_pending(Side::One, actor, target, action, ctx(&balance), &mut rng);
            assert_eq!(pending.damage, 0);
            assert_eq!(rng.state(), 5);
            assert_eq!(pending.energy_regen, 8);
        }
    }

    #[test]
    fn heal_stays_in_range() {
        let state = battle();
        let balance = BalanceTable::new();
        let (actor, target) = state.actor_and_opponent(Side::One);
        let mut rng = Lcg::new(77);
        for _ in 0..200 {
            let pending = compute_pending(
                Side::One,
                actor,
                target,
                Action::HealingRoutine,
                ctx(&balance),
                &mut rng,
            );
            assert!((60..=90).contains(&pending.healing), "{}", pending.healing);
        }
    }

    #[test]
    fn stance_and_speed_reduce_damage() {
        let state = battle();
        let balance = BalanceTable::new();
        let (actor, target) = state.actor_and_opponent(Side::One);

        let open = compute_pending(
            Side::One,
            actor,
            target,
            Action::UseLightAttack,
            ctx(&balance),
            &mut Lcg::new(3),
        );
        let guarded = compute_pending(
            Side::One,
            actor,
            target,
            Action::UseLightAttack,
            PendingContext {
                balance: &balance,
                target_stance: Some(Action::FullDefense),
                has_speed_advantage: false,
            },
            &mut Lcg::new(3),
        );
        assert!(guarded.damage < open.damage);
        assert!(guarded.damage >= 1);
    }

    #[test]
    fn burst_status_mapping() {
        assert_eq!(burst_status(Element::Volt), StatusEffectKind::Stun);
        assert_eq!(burst_status(Element::Cryo), StatusEffectKind::Freeze);
        assert_eq!(burst_status(Element::Pyro), StatusEffectKind::Burn);
        assert_eq!(burst_status(Element::Void), StatusEffectKind::Poison);
    }
}
