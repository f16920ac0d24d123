//! Tiered memory-decay model.
//!
//! Strength is a 0-100 proxy for consolidation. Decay is linear within a
//! strength tier: weaker memories lose more units per day. All functions
//! are pure; elapsed time arrives as a plain number of days so decay is
//! idempotent and time-pure - projecting twice from the same inputs gives
//! the same result.

use crate::types::{MemoryParams, STRENGTH_MAX, STRENGTH_MIN};

/// Project the current strength after `elapsed_days` without review.
///
/// The decay rate is chosen from the pre-decay strength tier. The loss is
/// capped at the remaining strength, so the result never goes below 0.
/// Callers with a never-reviewed concept skip decay entirely (there is no
/// elapsed time to measure from).
pub fn decay(strength: f64, elapsed_days: f64, params: &MemoryParams) -> f64 {
    let strength = strength.clamp(STRENGTH_MIN, STRENGTH_MAX);
    if elapsed_days <= 0.0 {
        return strength;
    }
    let rate = params.decay_per_day[params.tier_index(strength)];
    let amount = (rate * elapsed_days).min(strength);
    (strength - amount).max(STRENGTH_MIN)
}

/// Review interval in hours for a concept at `strength`.
pub fn due_interval_hours(strength: f64, params: &MemoryParams) -> f64 {
    let strength = strength.clamp(STRENGTH_MIN, STRENGTH_MAX);
    params.interval_hours[params.tier_index(strength)]
}

/// Signed strength adjustment for a review outcome.
///
/// Rewards are deliberately larger than penalties: a failed review should
/// not collapse strength in one step, review exists for incremental
/// reinforcement. Scores outside 0-100 are clamped, matching the tolerance
/// for a noisy upstream evaluator.
pub fn strength_delta(score: i32, is_pass: bool, params: &MemoryParams) -> f64 {
    let score = score.clamp(0, 100);
    if is_pass {
        select_delta(score, &params.pass_score_cutoffs, &params.pass_rewards)
    } else {
        select_delta(score, &params.fail_score_cutoffs, &params.fail_penalties)
    }
}

fn select_delta(score: i32, cutoffs: &[i32; 2], values: &[f64; 3]) -> f64 {
    for (cutoff, value) in cutoffs.iter().zip(values.iter()) {
        if score >= *cutoff {
            return *value;
        }
    }
    values[2]
}
