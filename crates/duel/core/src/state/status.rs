//! Status effect bookkeeping for a combatant.
//!
//! Each active effect carries a remaining-duration counter that is decremented
//! once per round during status decay and removed when it reaches zero. An
//! effect inflicted during a round is not decremented until the following
//! round, so a duration of `n` covers the next `n` rounds.

use arrayvec::ArrayVec;
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Maximum distinct effects; one slot per kind.
pub const MAX_STATUS_EFFECTS: usize = 4;

/// Types of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StatusEffectKind {
    /// Skips the next action.
    Stun,
    /// Periodic HP loss.
    Burn,
    /// Halves speed until expiry.
    Freeze,
    /// Periodic HP loss at a lower rate than burn.
    Poison,
}

impl StatusEffectKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl core::fmt::Display for StatusEffectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single active effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStatus {
    pub kind: StatusEffectKind,
    /// Rounds left before removal.
    pub remaining: u32,
    /// Round in which the effect was (re)applied.
    pub applied_round: u32,
}

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<ActiveStatus, MAX_STATUS_EFFECTS>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Remaining rounds of an effect, if active.
    pub fn remaining(&self, kind: StatusEffectKind) -> Option<u32> {
        self.effects
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.remaining)
    }

    /// Applies an effect. Re-applying an active effect resets its duration.
    ///
    /// Returns `true` if the effect was not previously active.
    pub fn apply(&mut self, kind: StatusEffectKind, duration: u32, round: u32) -> bool {
        if duration == 0 {
            return false;
        }
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = duration;
            existing.applied_round = round;
            return false;
        }
        // One slot per kind, so the push cannot overflow.
        self.effects.push(ActiveStatus {
            kind,
            remaining: duration,
            applied_round: round,
        });
        true
    }

    /// Decrements every effect not applied during `round` and removes those
    /// reaching zero. Returns the kinds that expired.
    ///
    /// An effect inflicted in round `r` is first decremented at the end of
    /// round `r + 1`, so a duration of `n` stays active through round `r + n`.
    pub fn decay(&mut self, round: u32) -> ArrayVec<StatusEffectKind, MAX_STATUS_EFFECTS> {
        let mut expired = ArrayVec::new();
        for effect in self.effects.iter_mut() {
            if effect.applied_round == round {
                continue;
            }
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatus> {
        self.effects.iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item = StatusEffectKind> + '_ {
        self.effects.iter().map(|e| e.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}
