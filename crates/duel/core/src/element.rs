//! Element advantage matrix.
//!
//! Six elements form one directed cycle:
//! `VOLT > CRYO > PYRO > NANO > VOID > IRON > VOLT`.
//! Each element beats exactly one element and loses to exactly one; every
//! other pairing, including mirror matches, is neutral.

use strum::{EnumIter, EnumString, IntoStaticStr};

/// Robot element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Element {
    Volt,
    Pyro,
    Cryo,
    Nano,
    Void,
    Iron,
}

impl Element {
    pub const ALL: [Element; 6] = [
        Element::Volt,
        Element::Pyro,
        Element::Cryo,
        Element::Nano,
        Element::Void,
        Element::Iron,
    ];

    /// The single element this one is strong against.
    pub const fn beats(self) -> Element {
        match self {
            Element::Volt => Element::Cryo,
            Element::Cryo => Element::Pyro,
            Element::Pyro => Element::Nano,
            Element::Nano => Element::Void,
            Element::Void => Element::Iron,
            Element::Iron => Element::Volt,
        }
    }

    /// The single element this one is weak against.
    pub const fn beaten_by(self) -> Element {
        match self {
            Element::Cryo => Element::Volt,
            Element::Pyro => Element::Cryo,
            Element::Nano => Element::Pyro,
            Element::Void => Element::Nano,
            Element::Iron => Element::Void,
            Element::Volt => Element::Iron,
        }
    }

    /// Whether `self` attacking `defender` has the advantage.
    pub fn has_advantage_over(self, defender: Element) -> bool {
        self.beats() == defender
    }

    /// Row/column index in [`ElementMatrix::table`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl core::fmt::Display for Element {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship of an attacking element to a defending one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Affinity {
    Advantage,
    Disadvantage,
    Neutral,
}

/// Damage multipliers keyed by element affinity.
///
/// Stateless apart from its two tunable multipliers; safe to share across
/// battles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElementMatrix {
    pub advantage: f64,
    pub disadvantage: f64,
}

impl ElementMatrix {
    pub const NEUTRAL: f64 = 1.0;

    pub const DEFAULT: Self = Self {
        advantage: 1.1,
        disadvantage: 0.9,
    };

    pub const fn new(advantage: f64, disadvantage: f64) -> Self {
        Self {
            advantage,
            disadvantage,
        }
    }

    /// Classifies an attacker/defender pairing.
    pub fn affinity(attacker: Element, defender: Element) -> Affinity {
        if attacker.beats() == defender {
            Affinity::Advantage
        } else if defender.beats() == attacker {
            Affinity::Disadvantage
        } else {
            Affinity::Neutral
        }
    }

    pub fn is_advantage(attacker: Element, defender: Element) -> bool {
        Self::affinity(attacker, defender) == Affinity::Advantage
    }

    pub fn is_disadvantage(attacker: Element, defender: Element) -> bool {
        Self::affinity(attacker, defender) == Affinity::Disadvantage
    }

    /// Damage multiplier when `attacker` hits `defender`.
    pub fn multiplier(&self, attacker: Element, defender: Element) -> f64 {
        match Self::affinity(attacker, defender) {
            Affinity::Advantage => self.advantage,
            Affinity::Disadvantage => self.disadvantage,
            Affinity::Neutral => Self::NEUTRAL,
        }
    }

    /// Full `table[attacker][defender]` dump, indexed by [`Element::index`].
    pub fn table(&self) -> [[f64; 6]; 6] {
        let mut table = [[Self::NEUTRAL; 6]; 6];
        for attacker in Element::ALL {
            for defender in Element::ALL {
                table[attacker.index()][defender.index()] = self.multiplier(attacker, defender);
            }
        }
        table
    }
}

impl Default for ElementMatrix {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn every_pair_has_exactly_one_affinity() {
        for attacker in Element::iter() {
            for defender in Element::iter() {
                let flags = [
                    ElementMatrix::is_advantage(attacker, defender),
                    ElementMatrix::is_disadvantage(attacker, defender),
                    ElementMatrix::affinity(attacker, defender) == Affinity::Neutral,
                ];
                assert_eq!(flags.iter().filter(|f| **f).count(), 1);
            }
        }
    }

    #[test]
    fn cycle_is_closed() {
        let edges = Element::ALL
            .iter()
            .flat_map(|a| Element::ALL.iter().map(move |d| (*a, *d)))
            .filter(|(a, d)| ElementMatrix::is_advantage(*a, *d))
            .count();
        assert_eq!(edges, 6);

        // Walking `beats` six times from any element returns to it and
        // visits every element once.
        let mut seen = Vec::new();
        let mut current = Element::Volt;
        for _ in 0..6 {
            assert!(!seen.contains(&current));
            seen.push(current);
            current = current.beats();
        }
        assert_eq!(current, Element::Volt);

        for element in Element::ALL {
            assert_ne!(element.beats(), element);
            assert_eq!(element.beats().beaten_by(), element);
        }
    }

    #[test]
    fn default_multipliers() {
        let matrix = ElementMatrix::default();
        assert_eq!(matrix.multiplier(Element::Volt, Element::Cryo), 1.1);
        assert_eq!(matrix.multiplier(Element::Cryo, Element::Volt), 0.9);
        assert_eq!(matrix.multiplier(Element::Pyro, Element::Pyro), 1.0);
        assert_eq!(matrix.multiplier(Element::Volt, Element::Nano), 1.0);
        assert_eq!(matrix.multiplier(Element::Iron, Element::Volt), 1.1);
    }

    #[test]
    fn table_matches_multiplier() {
        let matrix = ElementMatrix::default();
        let table = matrix.table();
        for attacker in Element::ALL {
            for defender in Element::ALL {
                assert_eq!(
                    table[attacker.index()][defender.index()],
                    matrix.multiplier(attacker, defender)
                );
            }
        }
    }

    #[test]
    fn tags_parse() {
        assert_eq!(Element::from_str("VOID").unwrap(), Element::Void);
        assert_eq!(Element::Nano.to_string(), "NANO");
        assert!(Element::from_str("PLASMA").is_err());
    }
}
