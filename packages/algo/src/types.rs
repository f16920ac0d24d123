//! Shared params structs and constants for the review algorithms.

use serde::{Deserialize, Serialize};

/// Lower bound of the memory strength scale (fully forgotten).
pub const STRENGTH_MIN: f64 = 0.0;

/// Upper bound of the memory strength scale (maximally consolidated).
pub const STRENGTH_MAX: f64 = 100.0;

/// Numerical stability epsilon.
pub const EPSILON: f64 = 1e-9;

/// Tuned constants of the memory model.
///
/// The tier cutoffs partition the strength scale into six bands; each band
/// carries its own decay rate and review interval. Weaker memories decay
/// faster and come due sooner. The defaults are the canonical tuning; the
/// numbers are tuned by trial, so they are configurable rather than baked
/// into the functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryParams {
    /// Upper bounds of the first five strength tiers; the sixth tier is
    /// everything at or above the last cutoff. Must be strictly increasing.
    pub tier_cutoffs: [f64; 5],
    /// Decay rate per tier, in strength units per day.
    pub decay_per_day: [f64; 6],
    /// Review interval per tier, in hours.
    pub interval_hours: [f64; 6],
    /// Score cutoffs for passing reviews: score >= cutoff selects the
    /// matching reward, otherwise the last reward applies.
    pub pass_score_cutoffs: [i32; 2],
    /// Strength rewards for passing reviews, aligned with
    /// `pass_score_cutoffs` plus a final catch-all entry.
    pub pass_rewards: [f64; 3],
    /// Score cutoffs for failing reviews.
    pub fail_score_cutoffs: [i32; 2],
    /// Strength penalties (negative) for failing reviews, aligned with
    /// `fail_score_cutoffs` plus a final catch-all entry.
    pub fail_penalties: [f64; 3],
}

impl Default for MemoryParams {
    fn default() -> Self {
        Self {
            tier_cutoffs: [20.0, 40.0, 60.0, 75.0, 90.0],
            decay_per_day: [5.0, 2.0, 1.0, 0.5, 0.2, 0.1],
            interval_hours: [1.0, 24.0, 48.0, 96.0, 168.0, 336.0],
            pass_score_cutoffs: [95, 90],
            pass_rewards: [30.0, 25.0, 20.0],
            fail_score_cutoffs: [60, 40],
            fail_penalties: [-5.0, -10.0, -15.0],
        }
    }
}

impl MemoryParams {
    /// Index of the strength tier that `strength` falls into.
    pub fn tier_index(&self, strength: f64) -> usize {
        self.tier_cutoffs
            .iter()
            .position(|&cutoff| strength < cutoff)
            .unwrap_or(self.tier_cutoffs.len())
    }
}

/// Sampling weights for the four interaction modes.
///
/// Active-recall probing consolidates better than passive explanation, so
/// probe dominates the default distribution while the other modes still
/// appear over a long session. Weights are relative; they need not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeWeights {
    pub probe: f64,
    pub explain: f64,
    pub implement: f64,
    pub connect: f64,
}

impl Default for ModeWeights {
    fn default() -> Self {
        Self {
            probe: 0.4,
            explain: 0.3,
            implement: 0.2,
            connect: 0.1,
        }
    }
}

impl ModeWeights {
    pub fn total(&self) -> f64 {
        self.probe + self.explain + self.implement + self.connect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_index_boundaries() {
        let params = MemoryParams::default();
        assert_eq!(params.tier_index(0.0), 0);
        assert_eq!(params.tier_index(19.9), 0);
        assert_eq!(params.tier_index(20.0), 1);
        assert_eq!(params.tier_index(59.9), 2);
        assert_eq!(params.tier_index(75.0), 4);
        assert_eq!(params.tier_index(90.0), 5);
        assert_eq!(params.tier_index(100.0), 5);
    }

    #[test]
    fn test_params_json_round_trip() {
        let params = MemoryParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: MemoryParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ModeWeights::default();
        assert!((weights.total() - 1.0).abs() < EPSILON);
    }
}
