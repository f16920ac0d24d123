//! Turns evaluation outcomes into atomic record patches.
//!
//! Decay is applied before the delta: the strength update must start from
//! what the learner actually remembers at review time, not from the raw
//! value persisted at the previous review.

use chrono::{DateTime, Utc};
use tracing::debug;

use cortex_algo::{decay, strength_delta, MemoryParams, STRENGTH_MAX, STRENGTH_MIN};

use crate::concept::{ConceptRecord, ConceptStatus};
use crate::evaluator::EvaluationOutcome;
use crate::store::RecordPatch;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Compute the full patch for one review outcome.
///
/// The patch carries strength, status, `last_reviewed`, and the flag
/// clear together so the store can commit them atomically. A pass lands
/// on `Understood` and clears the explicit review flag; a fail lands on
/// `NeedsReview` and leaves the flag alone.
pub fn integrate_outcome(
    record: &ConceptRecord,
    outcome: &EvaluationOutcome,
    now: DateTime<Utc>,
    params: &MemoryParams,
) -> RecordPatch {
    let score = outcome.score.clamp(0, 100);

    let current = match record.last_reviewed {
        Some(last) => {
            let elapsed_days = (now - last).num_seconds().max(0) as f64 / SECONDS_PER_DAY;
            decay(record.strength, elapsed_days, params)
        }
        None => record.strength,
    };

    let delta = strength_delta(score, outcome.is_pass, params);
    let new_strength = (current + delta).clamp(STRENGTH_MIN, STRENGTH_MAX);
    let new_status = if outcome.is_pass {
        ConceptStatus::Understood
    } else {
        ConceptStatus::NeedsReview
    };

    debug!(
        concept_id = %record.concept_id,
        score,
        is_pass = outcome.is_pass,
        current,
        delta,
        new_strength,
        "integrated review outcome"
    );

    RecordPatch {
        strength: Some(new_strength),
        status: Some(new_status),
        last_reviewed: Some(now),
        explicit_review_flag: if outcome.is_pass { Some(false) } else { None },
    }
}
