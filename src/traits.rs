//! Six-dimensional personality trait model.
//!
//! A [`TraitVector`] holds one score per [`TraitKind`], each kept inside
//! `0..=100`. Every mutation goes through [`TraitVector::apply_deltas`] or
//! [`TraitVector::apply_percentages`], which clamp each field independently.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest value a trait can take.
pub const TRAIT_MIN: u8 = 0;

/// Highest value a trait can take.
pub const TRAIT_MAX: u8 = 100;

/// Starting value of every trait in a fresh session.
pub const TRAIT_DEFAULT: u8 = 50;

// ---------------------------------------------------------------------------
// TraitKind
// ---------------------------------------------------------------------------

/// One personality dimension.
///
/// The declaration order is significant: it is the order of the on-chain
/// tuple and the tie-break order of [`TraitVector::dominant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitKind {
    Bravery,
    Logic,
    Empathy,
    Creativity,
    Greed,
    Wisdom,
}

impl TraitKind {
    /// All dimensions in canonical order.
    pub const ALL: [TraitKind; 6] = [
        TraitKind::Bravery,
        TraitKind::Logic,
        TraitKind::Empathy,
        TraitKind::Creativity,
        TraitKind::Greed,
        TraitKind::Wisdom,
    ];

    /// Position of this dimension in [`TraitKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase identifier, as used in JSON and prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            TraitKind::Bravery => "bravery",
            TraitKind::Logic => "logic",
            TraitKind::Empathy => "empathy",
            TraitKind::Creativity => "creativity",
            TraitKind::Greed => "greed",
            TraitKind::Wisdom => "wisdom",
        }
    }

    /// Capitalized display name, as used in token metadata.
    pub fn display_name(self) -> &'static str {
        match self {
            TraitKind::Bravery => "Bravery",
            TraitKind::Logic => "Logic",
            TraitKind::Empathy => "Empathy",
            TraitKind::Creativity => "Creativity",
            TraitKind::Greed => "Greed",
            TraitKind::Wisdom => "Wisdom",
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TraitBand
// ---------------------------------------------------------------------------

/// Coarse classification of a single trait value for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitBand {
    Low,
    Moderate,
    Strong,
    Exceptional,
}

impl TraitBand {
    pub fn of(value: u8) -> Self {
        if value >= 80 {
            TraitBand::Exceptional
        } else if value >= 60 {
            TraitBand::Strong
        } else if value >= 40 {
            TraitBand::Moderate
        } else {
            TraitBand::Low
        }
    }
}

// ---------------------------------------------------------------------------
// TraitVector
// ---------------------------------------------------------------------------

/// The personality profile: six independently clamped scores.
///
/// Deserialized values above 100 are clamped like any other input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawTraits")]
pub struct TraitVector {
    pub bravery: u8,
    pub logic: u8,
    pub empathy: u8,
    pub creativity: u8,
    pub greed: u8,
    pub wisdom: u8,
}

#[derive(Deserialize)]
struct RawTraits {
    bravery: u8,
    logic: u8,
    empathy: u8,
    creativity: u8,
    greed: u8,
    wisdom: u8,
}

impl From<RawTraits> for TraitVector {
    fn from(raw: RawTraits) -> Self {
        Self::from_array([
            raw.bravery,
            raw.logic,
            raw.empathy,
            raw.creativity,
            raw.greed,
            raw.wisdom,
        ])
    }
}

impl Default for TraitVector {
    fn default() -> Self {
        Self::uniform(TRAIT_DEFAULT)
    }
}

impl TraitVector {
    /// A vector with every field set to `value` (clamped).
    pub fn uniform(value: u8) -> Self {
        let v = value.min(TRAIT_MAX);
        Self::from_array([v; 6])
    }

    /// Build from the canonical-order tuple. Values above 100 are clamped.
    pub fn from_array(values: [u8; 6]) -> Self {
        let c = |v: u8| v.min(TRAIT_MAX);
        Self {
            bravery: c(values[0]),
            logic: c(values[1]),
            empathy: c(values[2]),
            creativity: c(values[3]),
            greed: c(values[4]),
            wisdom: c(values[5]),
        }
    }

    /// The canonical-order tuple `[bravery, logic, empathy, creativity, greed, wisdom]`.
    pub fn as_array(&self) -> [u8; 6] {
        [
            self.bravery,
            self.logic,
            self.empathy,
            self.creativity,
            self.greed,
            self.wisdom,
        ]
    }

    pub fn get(&self, kind: TraitKind) -> u8 {
        self.as_array()[kind.index()]
    }

    /// Iterate `(kind, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TraitKind, u8)> + '_ {
        TraitKind::ALL.iter().map(move |&k| (k, self.get(k)))
    }

    /// Presentation band of every trait.
    pub fn bands(&self) -> BTreeMap<TraitKind, TraitBand> {
        self.iter().map(|(kind, value)| (kind, TraitBand::of(value))).collect()
    }

    /// Apply additive deltas, then clamp every field to `0..=100`.
    ///
    /// Deltas for the same trait compound. Clamping happens once, after all
    /// deltas, so `+200` then `-150` on a 50 lands on 100.
    pub fn apply_deltas(&self, deltas: &[(TraitKind, i32)]) -> Self {
        let mut wide: [i64; 6] = self.as_array().map(i64::from);
        for &(kind, delta) in deltas {
            wide[kind.index()] += i64::from(delta);
        }
        Self::from_wide(wide)
    }

    /// Scale each field by a percentage (100 = unchanged), then clamp.
    ///
    /// Uses integer division, so `55 * 110 / 100` is `60`.
    pub fn apply_percentages(&self, percentages: [u16; 6]) -> Self {
        let mut wide: [i64; 6] = self.as_array().map(i64::from);
        for (value, pct) in wide.iter_mut().zip(percentages) {
            *value = *value * i64::from(pct) / 100;
        }
        Self::from_wide(wide)
    }

    /// The highest-scoring trait. Ties resolve to the first in canonical order.
    pub fn dominant(&self) -> TraitKind {
        let mut best = TraitKind::Bravery;
        for (kind, value) in self.iter() {
            if value > self.get(best) {
                best = kind;
            }
        }
        best
    }

    /// Sum of all six fields (at most 600).
    pub fn total(&self) -> u32 {
        self.as_array().iter().map(|&v| u32::from(v)).sum()
    }

    fn from_wide(wide: [i64; 6]) -> Self {
        let clamp = |v: i64| v.clamp(i64::from(TRAIT_MIN), i64::from(TRAIT_MAX)) as u8;
        Self {
            bravery: clamp(wide[0]),
            logic: clamp(wide[1]),
            empathy: clamp(wide[2]),
            creativity: clamp(wide[3]),
            greed: clamp(wide[4]),
            wisdom: clamp(wide[5]),
        }
    }
}

impl fmt::Display for TraitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bravery {}, Logic {}, Empathy {}, Creativity {}, Greed {}, Wisdom {}",
            self.bravery, self.logic, self.empathy, self.creativity, self.greed, self.wisdom
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_fifty() {
        assert_eq!(TraitVector::default().as_array(), [50; 6]);
        assert_eq!(TraitVector::default().total(), 300);
    }

    #[test]
    fn test_apply_deltas_clamps_high_and_low() {
        let v = TraitVector::default().apply_deltas(&[
            (TraitKind::Bravery, 1_000),
            (TraitKind::Greed, -1_000),
            (TraitKind::Wisdom, i32::MAX),
            (TraitKind::Logic, i32::MIN),
        ]);
        assert_eq!(v.bravery, 100);
        assert_eq!(v.greed, 0);
        assert_eq!(v.wisdom, 100);
        assert_eq!(v.logic, 0);
        assert_eq!(v.empathy, 50);
    }

    #[test]
    fn test_apply_deltas_compound_before_clamp() {
        let v = TraitVector::default()
            .apply_deltas(&[(TraitKind::Empathy, 200), (TraitKind::Empathy, -150)]);
        assert_eq!(v.empathy, 100);
    }

    #[test]
    fn test_apply_percentages() {
        let v = TraitVector::from_array([50, 50, 50, 50, 95, 0])
            .apply_percentages([110, 100, 80, 130, 130, 500]);
        assert_eq!(v.as_array(), [55, 50, 40, 65, 100, 0]);
    }

    #[test]
    fn test_dominant_unique_max() {
        let v = TraitVector::default().apply_deltas(&[(TraitKind::Wisdom, 30)]);
        assert_eq!(v.dominant(), TraitKind::Wisdom);
    }

    #[test]
    fn test_dominant_ties_break_to_first() {
        assert_eq!(TraitVector::default().dominant(), TraitKind::Bravery);
        let v = TraitVector::from_array([10, 20, 90, 90, 90, 5]);
        assert_eq!(v.dominant(), TraitKind::Empathy);
    }

    #[test]
    fn test_from_array_clamps() {
        let v = TraitVector::from_array([255, 0, 101, 100, 1, 99]);
        assert_eq!(v.as_array(), [100, 0, 100, 100, 1, 99]);
    }

    #[test]
    fn test_band() {
        assert_eq!(TraitBand::of(100), TraitBand::Exceptional);
        assert_eq!(TraitBand::of(80), TraitBand::Exceptional);
        assert_eq!(TraitBand::of(79), TraitBand::Strong);
        assert_eq!(TraitBand::of(40), TraitBand::Moderate);
        assert_eq!(TraitBand::of(39), TraitBand::Low);
    }

    #[test]
    fn test_bands_follow_values() {
        let v = TraitVector::from_array([90, 65, 50, 10, 0, 80]);
        let bands = v.bands();
        assert_eq!(bands[&TraitKind::Bravery], TraitBand::Exceptional);
        assert_eq!(bands[&TraitKind::Logic], TraitBand::Strong);
        assert_eq!(bands[&TraitKind::Empathy], TraitBand::Moderate);
        assert_eq!(bands[&TraitKind::Greed], TraitBand::Low);
        let json = serde_json::to_value(&bands).unwrap();
        assert_eq!(json["wisdom"], "exceptional");
        assert_eq!(json["creativity"], "low");
    }

    #[test]
    fn test_deserialize_clamps() {
        let v: TraitVector = serde_json::from_str(
            r#"{"bravery":250,"logic":101,"empathy":100,"creativity":0,"greed":7,"wisdom":55}"#,
        )
        .unwrap();
        assert_eq!(v.as_array(), [100, 100, 100, 0, 7, 55]);

        let v: TraitVector =
            serde_yaml::from_str("{bravery: 200, logic: 1, empathy: 2, creativity: 3, greed: 4, wisdom: 5}")
                .unwrap();
        assert_eq!(v.bravery, 100);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(TraitVector::default()).unwrap();
        assert_eq!(json["bravery"], 50);
        assert_eq!(json["wisdom"], 50);
    }
}
