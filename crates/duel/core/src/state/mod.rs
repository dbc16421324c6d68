//! Battle state model.
//!
//! [`BattleState`] is owned by a single resolver call and passed down by
//! exclusive reference. Nothing in this module is shared between battles.

mod combatant;
mod status;

pub use combatant::{
    CombatantDefinition, CombatantState, GiftStat, HpHistory, PassiveTrait, Progression,
    StatGifts, SuperAttack, SuperSlot,
};
pub use status::{ActiveStatus, MAX_STATUS_EFFECTS, StatusEffectKind, StatusEffects};

use crate::config::BalanceTable;

/// One of the two combatants in a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::One, Side::Two];

    pub const fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Side::One => f.write_str("side one"),
            Side::Two => f.write_str("side two"),
        }
    }
}

/// Snapshot of both combatants and the current round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// 1-based; 0 before the first round starts.
    pub round: u32,
    pub combatants: [CombatantState; 2],
}

impl BattleState {
    pub fn new(one: CombatantDefinition, two: CombatantDefinition, balance: &BalanceTable) -> Self {
        Self {
            round: 0,
            combatants: [
                CombatantState::new(one, balance),
                CombatantState::new(two, balance),
            ],
        }
    }

    pub fn side(&self, side: Side) -> &CombatantState {
        &self.combatants[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut CombatantState {
        &mut self.combatants[side.index()]
    }

    /// `(acting side, its opponent)`.
    pub fn actor_and_opponent(&self, side: Side) -> (&CombatantState, &CombatantState) {
        (self.side(side), self.side(side.opponent()))
    }

    /// Mutable `(acting side, its opponent)`.
    pub fn pair_mut(&mut self, side: Side) -> (&mut CombatantState, &mut CombatantState) {
        let [one, two] = &mut self.combatants;
        match side {
            Side::One => (one, two),
            Side::Two => (two, one),
        }
    }

    pub fn both_alive(&self) -> bool {
        self.combatants.iter().all(CombatantState::is_alive)
    }

    pub fn any_down(&self) -> bool {
        !self.both_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn pair_mut_orients_by_side() {
        let mut state = BattleState::new(
            CombatantDefinition::new("left", Element::Volt),
            CombatantDefinition::new("right", Element::Cryo),
            &BalanceTable::new(),
        );

        let (actor, opponent) = state.pair_mut(Side::Two);
        assert_eq!(actor.id(), "right");
        opponent.take_damage(10);

        assert_eq!(state.side(Side::One).current_hp, 990);
        assert_eq!(Side::One.opponent(), Side::Two);
        assert!(state.both_alive());
    }
}
