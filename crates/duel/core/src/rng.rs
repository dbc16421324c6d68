//! Deterministic random number generation.
//!
//! Every battle owns exactly one [`Lcg`]. There is no global generator: two
//! battles computed concurrently never observe each other's draws, which is
//! what makes replays reproducible.
//!
//! # Determinism
//!
//! The recurrence is computed with wrapping `u32` arithmetic, so the sequence
//! is identical on every platform. Given the same seed and the same call
//! sequence, two generators produce bit-identical output forever.

/// 2^32 as a float, the modulus of the recurrence.
const MODULUS: f64 = 4_294_967_296.0;

/// Source of deterministic randomness consumed by the combat resolver.
///
/// Only [`next_u32`](RandomSource::next_u32) is required; every derived draw
/// is defined in terms of it so that any implementation yields the same
/// derived values for the same raw stream.
pub trait RandomSource {
    /// Advance the generator and return the raw unsigned 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / MODULUS
    }

    /// Uniform integer in `[min, max]` inclusive.
    ///
    /// Always consumes exactly one draw, even for a single-value range, so
    /// the stream position does not depend on the bounds. Returns `min` when
    /// `max <= min`.
    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let unit = self.next_f64();
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + (unit * span).floor() as i64
    }

    /// `true` with the given probability (0.0 - 1.0).
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform float in `[min, max)`.
    fn next_float(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Linear congruential generator (Numerical Recipes parameters).
///
/// `state' = (1_664_525 * state + 1_013_904_223) mod 2^32`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const MULTIPLIER: u32 = 1_664_525;
    pub const INCREMENT: u32 = 1_013_904_223;

    /// Creates a generator from an unsigned 32-bit seed.
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Creates a generator from a signed or wider seed representation.
    ///
    /// The seed is normalized to its low 32 bits rather than rejected.
    pub const fn from_signed_seed(seed: i64) -> Self {
        Self::new(normalize_seed(seed))
    }

    /// Current internal state, for checkpointing.
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Restores a previously captured state.
    pub fn set_state(&mut self, state: u32) {
        self.state = state;
    }

    /// Picks one element of a slice, or `None` if it is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_int(0, items.len() as i64 - 1) as usize;
        items.get(index)
    }

    /// Returns a shuffled copy of `items` (Fisher-Yates).
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled = items.to_vec();
        for i in (1..shuffled.len()).rev() {
            let j = self.next_int(0, i as i64) as usize;
            shuffled.swap(i, j);
        }
        shuffled
    }
}

impl RandomSource for Lcg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }
}

/// Normalizes any integer seed to the unsigned 32-bit domain (two's
/// complement low bits), so `-1` becomes `u32::MAX`.
pub const fn normalize_seed(seed: i64) -> u32 {
    seed as u32
}

/// Derives a battle seed from both participants' ids and a timestamp.
///
/// `hash = timestamp; for each UTF-16 unit: hash = hash * 31 + unit`, all
/// wrapping at 32 bits.
pub fn derive_battle_seed(player_one: &str, player_two: &str, timestamp: u64) -> u32 {
    player_one
        .encode_utf16()
        .chain(player_two.encode_utf16())
        .fold(timestamp as u32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(u32::from(unit))
        })
}
