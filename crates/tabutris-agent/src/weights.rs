//! Heuristic weights and where they come from.
//!
//! Every heuristic agent scores candidate placements with five factors. A
//! weight set starts from [`HeuristicWeights::BASE`] and, by default, gets a
//! small independent jitter per factor so that repeated runs explore nearby
//! weight sets. The jitter source is chosen with [`WeightSource`]:
//!
//! - [`WeightSource::Jittered`] draws from OS randomness. Two runs with the
//!   same game seed may still play differently.
//! - [`WeightSource::SeededJitter`] makes the jitter reproducible.
//! - [`WeightSource::Fixed`] skips jitter entirely.

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the jitter added to each base factor.
pub const JITTER: f64 = 0.1;

/// Factors of the placement evaluation function.
///
/// See [`evaluate`](crate::evaluate) for how each factor is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    /// Reward for keeping the highest occupied cell low.
    pub height: f64,
    /// Scale of the column height difference before squaring.
    pub balance: f64,
    /// Penalty per empty cell below a column's top.
    pub hole: f64,
    /// Penalty per newly placed cell stacked directly above a hole.
    pub block: f64,
    /// Reward per completed row.
    pub line: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self::BASE
    }
}

impl HeuristicWeights {
    pub const BASE: Self = Self {
        height: 1.0,
        balance: 1.0,
        hole: 12.0,
        block: 1.0,
        line: 1.0,
    };

    /// Returns [`HeuristicWeights::BASE`] with an independent uniform jitter in
    /// `[0, JITTER)` added to each factor.
    pub fn jittered<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut jitter = || rng.random_range(0.0..JITTER);
        Self {
            height: Self::BASE.height + jitter(),
            balance: Self::BASE.balance + jitter(),
            hole: Self::BASE.hole + jitter(),
            block: Self::BASE.block + jitter(),
            line: Self::BASE.line + jitter(),
        }
    }
}

/// How an agent obtains its weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum WeightSource {
    /// Base weights jittered from the OS random source.
    #[default]
    Jittered,
    /// Base weights jittered from a generator seeded with the given value.
    SeededJitter(u64),
    /// Exactly these weights.
    Fixed(HeuristicWeights),
}

impl WeightSource {
    /// Produces a weight set. [`WeightSource::Jittered`] yields a fresh set on every call.
    #[must_use]
    pub fn resolve(&self) -> HeuristicWeights {
        match *self {
            WeightSource::Jittered => HeuristicWeights::jittered(&mut rand::rng()),
            WeightSource::SeededJitter(seed) => {
                HeuristicWeights::jittered(&mut Pcg32::seed_from_u64(seed))
            }
            WeightSource::Fixed(weights) => weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within_jitter(weights: &HeuristicWeights) -> bool {
        let base = HeuristicWeights::BASE;
        [
            (weights.height, base.height),
            (weights.balance, base.balance),
            (weights.hole, base.hole),
            (weights.block, base.block),
            (weights.line, base.line),
        ]
        .into_iter()
        .all(|(w, b)| (b..b + JITTER).contains(&w))
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..100 {
            assert!(within_jitter(&HeuristicWeights::jittered(&mut rng)));
        }
        assert!(within_jitter(&WeightSource::Jittered.resolve()));
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let a = WeightSource::SeededJitter(9).resolve();
        let b = WeightSource::SeededJitter(9).resolve();
        let c = WeightSource::SeededJitter(10).resolve();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fixed_weights_pass_through() {
        let weights = HeuristicWeights {
            line: 100.0,
            ..HeuristicWeights::BASE
        };
        assert_eq!(WeightSource::Fixed(weights).resolve(), weights);
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{"height":1.0,"balance":1.5,"hole":12.0,"block":1.0,"line":3.0}"#;
        let weights: HeuristicWeights = serde_json::from_str(json).unwrap();
        assert_eq!(weights.balance, 1.5);
        assert_eq!(weights.line, 3.0);
        let back: HeuristicWeights =
            serde_json::from_str(&serde_json::to_string(&weights).unwrap()).unwrap();
        assert_eq!(back, weights);
    }
}
