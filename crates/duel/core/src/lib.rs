//! Deterministic robot duel engine.
//!
//! `duel-core` simulates a turn-based duel between two combatants, each
//! driven by a declarative [`RuleProgram`], under a seeded [`Lcg`]. The same
//! [`BattleConfig`] always produces the same [`BattleResult`], so results can
//! be replayed and verified. The crate performs no I/O; every battle owns its
//! generator and state, and battles can run in parallel without coordination.
//!
//! Entry point: [`run_battle`].
pub mod combat;
pub mod config;
pub mod element;
pub mod error;
pub mod rng;
pub mod rules;
pub mod state;

pub use combat::{
    BattleResult, EvolutionEvent, PendingAction, Resolver, RoundEvent, RoundLog, RoundPhase,
    StatGiftEvent, apply_simultaneous, compute_pending, run_battle,
};
#[cfg(feature = "serde")]
pub use combat::{ReplayCheck, verify_replay};
pub use config::{BalanceTable, BattleConfig, DEFAULT_ROUND_CAP, HP_HISTORY_WINDOW};
pub use element::{Affinity, Element, ElementMatrix};
#[cfg(feature = "serde")]
pub use error::ReplayError;
pub use error::BattleSetupError;
pub use rng::{Lcg, RandomSource, derive_battle_seed, normalize_seed};
pub use rules::{Action, Condition, Rule, RuleProgram, choose_action};
pub use state::{
    BattleState, CombatantDefinition, CombatantState, GiftStat, PassiveTrait, Progression, Side,
    StatusEffectKind, SuperAttack,
};
