//! Combat resolution.
//!
//! A battle is resolved by [`run_battle`]. Each round computes both sides'
//! [`PendingAction`]s from one snapshot ([`compute_pending`]), applies the
//! damage of both at once ([`apply_simultaneous`]), and only then applies
//! everything else ([`apply_secondary`]).

mod apply;
mod damage;
mod pending;
mod progression;
mod resolver;
mod result;

pub use apply::{SecondaryContext, apply_secondary, apply_simultaneous};
pub use damage::{
    base_damage, reflected, roll_variance, speed_scaled, stance_mitigated, stance_reduction,
    tick_damage,
};
pub use pending::{Infliction, PendingAction, PendingContext, burst_status, compute_pending};
pub use progression::{
    KillOutcome, check_evolution, check_stat_gift, credit_kill, draw_gift_interval,
};
pub use resolver::{Resolver, RoundPhase, run_battle};
#[cfg(feature = "serde")]
pub use result::{ReplayCheck, verify_replay};
pub use result::{BattleResult, EvolutionEvent, RoundEvent, RoundLog, StatGiftEvent};
