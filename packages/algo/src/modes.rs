//! Weighted interaction-mode sampling.
//!
//! Every queued concept is presented through one of four interaction
//! modes. The choice is randomized but weighted, and the RNG is injectable
//! so test suites can assert the distribution deterministically.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::types::ModeWeights;

/// How a queued concept is presented to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Active-recall questioning.
    Probe,
    /// Learner explains the concept back.
    Explain,
    /// Learner applies the concept in a small exercise.
    Implement,
    /// Learner relates the concept to others.
    Connect,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Probe => "probe",
            Self::Explain => "explain",
            Self::Implement => "implement",
            Self::Connect => "connect",
        }
    }
}

/// Draw one interaction mode from the weighted distribution.
///
/// Falls back to `Probe` when all weights are zero or non-finite.
pub fn choose_mode<R: Rng>(rng: &mut R, weights: &ModeWeights) -> InteractionMode {
    let total = weights.total();
    if !(total.is_finite() && total > 0.0) {
        return InteractionMode::Probe;
    }
    let mut roll = rng.gen::<f64>() * total;

    roll -= weights.probe;
    if roll < 0.0 {
        return InteractionMode::Probe;
    }
    roll -= weights.explain;
    if roll < 0.0 {
        return InteractionMode::Explain;
    }
    roll -= weights.implement;
    if roll < 0.0 {
        return InteractionMode::Implement;
    }
    InteractionMode::Connect
}

/// Stateful sampler owning a seedable RNG.
pub struct ModeSampler {
    weights: ModeWeights,
    rng: ChaCha8Rng,
}

impl ModeSampler {
    pub fn new(weights: ModeWeights) -> Self {
        let seed = {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        };
        Self::with_seed(weights, seed)
    }

    /// Create a sampler with a specific seed (for testing).
    pub fn with_seed(weights: ModeWeights, seed: u64) -> Self {
        Self {
            weights,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn next_mode(&mut self) -> InteractionMode {
        choose_mode(&mut self.rng, &self.weights)
    }
}

impl Default for ModeSampler {
    fn default() -> Self {
        Self::new(ModeWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_distribution_matches_weights() {
        let mut sampler = ModeSampler::with_seed(ModeWeights::default(), 7);
        let mut counts: HashMap<InteractionMode, usize> = HashMap::new();
        let draws = 20_000;
        for _ in 0..draws {
            *counts.entry(sampler.next_mode()).or_insert(0) += 1;
        }

        let share = |mode| *counts.get(&mode).unwrap_or(&0) as f64 / draws as f64;
        assert!((share(InteractionMode::Probe) - 0.4).abs() < 0.02);
        assert!((share(InteractionMode::Explain) - 0.3).abs() < 0.02);
        assert!((share(InteractionMode::Implement) - 0.2).abs() < 0.02);
        assert!((share(InteractionMode::Connect) - 0.1).abs() < 0.02);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ModeSampler::with_seed(ModeWeights::default(), 99);
        let mut b = ModeSampler::with_seed(ModeWeights::default(), 99);
        for _ in 0..100 {
            assert_eq!(a.next_mode(), b.next_mode());
        }
    }

    #[test]
    fn test_zero_mass_weight_never_drawn() {
        let weights = ModeWeights {
            probe: 0.0,
            explain: 1.0,
            implement: 1.0,
            connect: 0.0,
        };
        let mut sampler = ModeSampler::with_seed(weights, 3);
        for _ in 0..1_000 {
            let mode = sampler.next_mode();
            assert!(matches!(
                mode,
                InteractionMode::Explain | InteractionMode::Implement
            ));
        }
    }

    #[test]
    fn test_degenerate_weights_fall_back_to_probe() {
        let weights = ModeWeights {
            probe: 0.0,
            explain: 0.0,
            implement: 0.0,
            connect: 0.0,
        };
        let mut sampler = ModeSampler::with_seed(weights, 3);
        assert_eq!(sampler.next_mode(), InteractionMode::Probe);
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&InteractionMode::Implement).unwrap();
        assert_eq!(json, "\"implement\"");
    }
}
