//! Mutation phases of a round: simultaneous damage, then secondary effects.

use crate::config::BalanceTable;
use crate::rules::Action;
use crate::state::{BattleState, Side};

use super::damage::reflected;
use super::pending::PendingAction;
use super::result::RoundEvent;

/// Subtracts both sides' pending damage at once.
///
/// Returns the damage dealt to each side, indexed by [`Side::index`]. A side
/// knocked out here has still dealt its own damage, since both amounts were
/// computed before either was applied.
pub fn apply_simultaneous(
    state: &mut BattleState,
    pending: &[Option<PendingAction>; 2],
) -> [u32; 2] {
    let incoming = Side::ALL.map(|side| {
        pending[side.opponent().index()]
            .as_ref()
            .map_or(0, |p| p.damage)
    });
    for side in Side::ALL {
        state.side_mut(side).take_damage(incoming[side.index()]);
    }
    incoming
}

/// Round-local inputs to [`apply_secondary`].
#[derive(Clone, Copy, Debug)]
pub struct SecondaryContext<'a> {
    pub balance: &'a BalanceTable,
    pub round: u32,
    /// Side applied first (the speed-advantage side).
    pub first: Side,
    /// Each side's action from the previous round.
    pub previous: [Option<Action>; 2],
}

/// Applies everything except raw damage, fastest side first: energy cost
/// then regeneration, healing, status infliction, streaks, last action, and
/// counter-stance reflection.
///
/// Healing is skipped for a side knocked out this round.
pub fn apply_secondary(
    state: &mut BattleState,
    pending: &[Option<PendingAction>; 2],
    ctx: SecondaryContext<'_>,
    events: &mut Vec<RoundEvent>,
) {
    for side in [ctx.first, ctx.first.opponent()] {
        let Some(p) = pending[side.index()].as_ref() else {
            continue;
        };
        let (actor, target) = state.pair_mut(side);

        actor.settle_energy(p.energy_cost, p.energy_regen);
        let healed = if p.healing > 0 && actor.is_alive() {
            actor.heal(p.healing)
        } else {
            0
        };
        events.push(RoundEvent::Acted {
            side,
            chosen: p.chosen,
            action: p.action,
            damage: p.damage,
            healing: healed,
            element_multiplier: p.element_multiplier,
            fallback: p.fallback,
        });

        if let Some(inflict) = p.inflict {
            target.inflict(inflict.kind, inflict.duration, ctx.round);
            events.push(RoundEvent::StatusApplied {
                side: side.opponent(),
                kind: inflict.kind,
                duration: inflict.duration,
            });
        }

        actor.record_outcome(p.action, p.damage);
        actor.last_action = Some(p.action);

        let countered = ctx.previous[side.opponent().index()] == Some(Action::CounterStance);
        if countered && p.damage > 0 {
            let damage = reflected(p.damage, &ctx.balance.stances);
            actor.take_damage(damage);
            events.push(RoundEvent::Reflected {
                side: side.opponent(),
                damage,
            });
        }
    }
}
