//! Round loop orchestration.
//!
//! A [`Resolver`] owns the battle state and the battle's private generator
//! for the whole call; nothing is shared with other battles. Each round
//! walks the phases of [`RoundPhase`] in order.

use strum::{EnumIter, IntoStaticStr};

use crate::config::BattleConfig;
use crate::error::BattleSetupError;
use crate::rng::{Lcg, RandomSource};
use crate::rules::{Action, choose_action};
use crate::state::{BattleState, Progression, Side, StatusEffectKind};

use super::apply::{SecondaryContext, apply_secondary, apply_simultaneous};
use super::damage::tick_damage;
use super::pending::{PendingAction, PendingContext, compute_pending};
use super::progression::{credit_kill, draw_gift_interval};
use super::result::{BattleResult, EvolutionEvent, RoundEvent, RoundLog, StatGiftEvent};

/// Phases of a single round, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    RoundStart,
    StatusTick,
    ActionSelection,
    DamageCalculation,
    SimultaneousApplication,
    SecondaryEffects,
    StatusDecay,
    TerminationCheck,
}

/// Runs one battle to completion.
///
/// Fails only when the configuration violates a precondition; any
/// well-formed configuration produces a result.
pub fn run_battle(config: &BattleConfig) -> Result<BattleResult, BattleSetupError> {
    Ok(Resolver::new(config)?.run())
}

/// Scratch data of the round in progress.
#[derive(Debug, Default)]
struct RoundScratch {
    events: Vec<RoundEvent>,
    /// Each side's action from the previous round.
    previous: [Option<Action>; 2],
    chosen: [Option<Action>; 2],
    speed_advantage: Option<Side>,
    pending: [Option<PendingAction>; 2],
}

/// Battle in progress.
pub struct Resolver<'a> {
    config: &'a BattleConfig,
    state: BattleState,
    rng: Lcg,
    turns: Vec<RoundLog>,
    stat_gifts: Vec<StatGiftEvent>,
    evolutions: Vec<EvolutionEvent>,
}

impl<'a> Resolver<'a> {
    /// Validates `config` and prepares the initial state. Draws the gift
    /// interval of side one, then of side two.
    pub fn new(config: &'a BattleConfig) -> Result<Self, BattleSetupError> {
        config.validate()?;

        let [one, two] = config.combatants.clone();
        let mut state = BattleState::new(one, two, &config.balance);
        let mut rng = Lcg::new(config.seed);
        for side in Side::ALL {
            state.side_mut(side).next_gift_interval = draw_gift_interval(&mut rng, &config.balance);
        }

        Ok(Self {
            config,
            state,
            rng,
            turns: Vec::new(),
            stat_gifts: Vec::new(),
            evolutions: Vec::new(),
        })
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Whether another round will be played.
    pub fn is_running(&self) -> bool {
        self.state.both_alive() && self.state.round < self.config.round_cap
    }

    /// Plays rounds until a knockout or the round cap, then builds the
    /// result.
    pub fn run(mut self) -> BattleResult {
        while self.is_running() {
            self.play_round();
        }
        self.finish()
    }

    /// Plays exactly one round and returns its log, or `None` without
    /// touching any state once the battle has ended.
    pub fn play_round(&mut self) -> Option<&RoundLog> {
        if !self.is_running() {
            return None;
        }
        let mut scratch = RoundScratch::default();
        let mut phase = RoundPhase::RoundStart;
        loop {
            phase = match phase {
                RoundPhase::RoundStart => {
                    self.state.round += 1;
                    scratch.previous = Side::ALL.map(|side| self.state.side(side).last_action);
                    RoundPhase::StatusTick
                }
                RoundPhase::StatusTick => {
                    self.status_tick(&mut scratch);
                    if self.state.both_alive() {
                        RoundPhase::ActionSelection
                    } else {
                        RoundPhase::TerminationCheck
                    }
                }
                RoundPhase::ActionSelection => {
                    self.select_actions(&mut scratch);
                    RoundPhase::DamageCalculation
                }
                RoundPhase::DamageCalculation => {
                    self.calculate_damage(&mut scratch);
                    RoundPhase::SimultaneousApplication
                }
                RoundPhase::SimultaneousApplication => {
                    apply_simultaneous(&mut self.state, &scratch.pending);
                    RoundPhase::SecondaryEffects
                }
                RoundPhase::SecondaryEffects => {
                    self.secondary_effects(&mut scratch);
                    RoundPhase::StatusDecay
                }
                RoundPhase::StatusDecay => {
                    self.status_decay(&mut scratch);
                    RoundPhase::TerminationCheck
                }
                RoundPhase::TerminationCheck => break,
            };
        }

        for side in Side::ALL {
            if !self.state.side(side).is_alive() {
                scratch.events.push(RoundEvent::KnockedOut { side });
            }
        }
        self.turns.push(RoundLog {
            round: self.state.round,
            events: scratch.events,
            hp_after: Side::ALL.map(|side| self.state.side(side).current_hp),
            actions: scratch.chosen,
            speed_advantage: scratch.speed_advantage,
            rng_state: self.rng.state(),
        });
        self.turns.last()
    }

    /// BURN then POISON damage for each side.
    fn status_tick(&mut self, scratch: &mut RoundScratch) {
        let status = self.config.balance.status;
        for side in Side::ALL {
            let combatant = self.state.side_mut(side);
            for (kind, fraction) in [
                (StatusEffectKind::Burn, status.burn_tick),
                (StatusEffectKind::Poison, status.poison_tick),
            ] {
                if combatant.has_status(kind) {
                    let damage = tick_damage(combatant.max_hp(), fraction);
                    combatant.take_damage(damage);
                    scratch.events.push(RoundEvent::StatusTick { side, kind, damage });
                }
            }
        }
    }

    /// Resolves the speed advantage, then asks each non-stunned side's
    /// program for an action against the same snapshot.
    fn select_actions(&mut self, scratch: &mut RoundScratch) {
        let one = self.state.side(Side::One).current_speed;
        let two = self.state.side(Side::Two).current_speed;
        let advantage = if one > two {
            Side::One
        } else if two > one {
            Side::Two
        } else if self.rng.chance(0.5) {
            Side::One
        } else {
            Side::Two
        };
        scratch.speed_advantage = Some(advantage);

        for side in Side::ALL {
            if self.state.side(side).has_status(StatusEffectKind::Stun) {
                continue;
            }
            scratch.chosen[side.index()] =
                Some(choose_action(&self.state, side, self.config.program(side)));
        }
        for side in Side::ALL {
            if scratch.chosen[side.index()].is_none() {
                self.state.side_mut(side).last_action = None;
                scratch.events.push(RoundEvent::Stunned { side });
            }
        }
    }

    /// Computes pending actions, side one first.
    fn calculate_damage(&mut self, scratch: &mut RoundScratch) {
        for side in Side::ALL {
            let Some(action) = scratch.chosen[side.index()] else {
                continue;
            };
            let (actor, target) = self.state.actor_and_opponent(side);
            let ctx = PendingContext {
                balance: &self.config.balance,
                target_stance: scratch.previous[side.opponent().index()],
                has_speed_advantage: scratch.speed_advantage == Some(side),
            };
            scratch.pending[side.index()] =
                Some(compute_pending(side, actor, target, action, ctx, &mut self.rng));
        }
    }

    /// Secondary effects, then kill credit for each side whose opponent went
    /// down this round.
    fn secondary_effects(&mut self, scratch: &mut RoundScratch) {
        let first = scratch.speed_advantage.unwrap_or(Side::One);
        let round = self.state.round;
        apply_secondary(
            &mut self.state,
            &scratch.pending,
            SecondaryContext {
                balance: &self.config.balance,
                round,
                first,
                previous: scratch.previous,
            },
            &mut scratch.events,
        );

        for side in [first, first.opponent()] {
            if self.state.side(side.opponent()).is_alive() {
                continue;
            }
            let outcome = credit_kill(
                side,
                self.state.side_mut(side),
                round,
                &self.config.balance,
                &mut self.rng,
            );
            self.stat_gifts.extend(outcome.gift);
            self.evolutions.extend(outcome.evolution);
        }
    }

    /// Ages statuses (skipping those inflicted this round) and records HP
    /// history.
    fn status_decay(&mut self, scratch: &mut RoundScratch) {
        let round = self.state.round;
        for side in Side::ALL {
            let combatant = self.state.side_mut(side);
            for kind in combatant.decay_statuses(round) {
                scratch.events.push(RoundEvent::StatusExpired { side, kind });
            }
            let hp = combatant.current_hp;
            combatant.hp_history.push(hp);
        }
    }

    fn finish(self) -> BattleResult {
        let one = self.state.side(Side::One);
        let two = self.state.side(Side::Two);

        let winner_side = match (one.is_alive(), two.is_alive()) {
            (false, false) => None,
            (true, false) => Some(Side::One),
            (false, true) => Some(Side::Two),
            (true, true) => {
                let (a, b) = (one.hp_percent(), two.hp_percent());
                if a > b {
                    Some(Side::One)
                } else if b > a {
                    Some(Side::Two)
                } else {
                    None
                }
            }
        };
        let knockout = one.is_alive() != two.is_alive();
        let id = |side: Side| self.state.side(side).id().to_owned();

        BattleResult {
            winner: winner_side.map(id),
            loser: winner_side.map(|side| id(side.opponent())),
            winner_side,
            rounds: self.state.round,
            side_one_final_hp_pct: one.hp_percent().clamp(0.0, 100.0),
            side_two_final_hp_pct: two.hp_percent().clamp(0.0, 100.0),
            knockout_by: winner_side.filter(|_| knockout).map(id),
            final_progression: Side::ALL.map(|side| {
                let combatant = self.state.side(side);
                Progression {
                    total_kills: combatant.total_kills,
                    evolution_stage: combatant.evolution_stage,
                    kills_since_last_gift: combatant.kills_since_last_gift,
                }
            }),
            turns: self.turns,
            stat_gifts: self.stat_gifts,
            evolutions: self.evolutions,
            seed: self.config.seed,
        }
    }
}
