//! Rule evaluation.
//!
//! Pure functions over a [`BattleState`] snapshot: no mutation, no
//! randomness. Both sides of a round are evaluated against the same
//! snapshot, so neither observes the other's choice.

use crate::element::ElementMatrix;
use crate::state::{BattleState, CombatantState, Side, StatusEffectKind};

use super::{Action, Condition, Rule, RuleProgram};

/// Picks the action for `side`: the action of the first rule (in priority
/// order) whose condition holds, or [`Action::DEFAULT`].
pub fn choose_action(state: &BattleState, side: Side, program: &RuleProgram) -> Action {
    matching_rule(state, side, program)
        .map(|rule| rule.action)
        .unwrap_or(Action::DEFAULT)
}

/// The first rule whose condition holds for `side`, if any.
pub fn matching_rule<'a>(
    state: &BattleState,
    side: Side,
    program: &'a RuleProgram,
) -> Option<&'a Rule> {
    let (actor, opponent) = state.actor_and_opponent(side);
    program
        .rules()
        .iter()
        .find(|rule| evaluate(rule, actor, opponent, state.round))
}

/// Evaluates one rule's condition from `actor`'s point of view.
pub fn evaluate(rule: &Rule, actor: &CombatantState, opponent: &CombatantState, round: u32) -> bool {
    let threshold = rule.threshold();
    match rule.condition {
        Condition::MyHpBelow => actor.hp_percent() < threshold,
        Condition::MyHpAbove => actor.hp_percent() > threshold,
        Condition::EnemyHpBelow => opponent.hp_percent() < threshold,
        Condition::EnemyHpAbove80 => opponent.hp_percent() > 80.0,
        Condition::EnemyHpDroppingFast => {
            let history = &opponent.hp_history;
            match (history.len() >= 2, history.oldest(), history.newest()) {
                (true, Some(oldest), Some(newest)) => {
                    let dropped = (f64::from(oldest) - f64::from(newest))
                        / f64::from(opponent.max_hp())
                        * 100.0;
                    dropped > rule.threshold_or(Condition::DEFAULT_DROP_PERCENT)
                }
                _ => false,
            }
        }
        Condition::MyAttackMovesExhausted => {
            let definition = &actor.definition;
            !actor.can_afford(definition.super_attack_1.energy_cost)
                && !actor.can_afford(definition.super_attack_2.energy_cost)
        }
        Condition::EnemyLastMoveWasHeavyAttack => {
            opponent.last_action == Some(Action::UseHeavyAttack)
        }
        Condition::EnemyLastMoveWasDefense => {
            opponent.last_action.is_some_and(Action::is_defense)
        }
        Condition::MyEnergyCritical => {
            actor.energy_percent()
                < rule.threshold_or(Condition::DEFAULT_ENERGY_CRITICAL_PERCENT)
        }
        Condition::RoundNumberAbove => f64::from(round) > threshold,
        Condition::EnemyElementAdvantage => {
            ElementMatrix::is_advantage(opponent.element(), actor.element())
        }
        Condition::EnemyElementDisadvantage => {
            ElementMatrix::is_advantage(actor.element(), opponent.element())
        }
        Condition::IAmStunned => actor.has_status(StatusEffectKind::Stun),
        Condition::MySuperAvailable => {
            let definition = &actor.definition;
            actor.can_afford(definition.super_attack_1.energy_cost)
                || actor.can_afford(definition.super_attack_2.energy_cost)
        }
        Condition::ConsecutiveHitsAbove => f64::from(actor.consecutive_hits) > threshold,
        Condition::MissStreakAbove => f64::from(actor.miss_streak) > threshold,
        Condition::Unknown => false,
    }
}
