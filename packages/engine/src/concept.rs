//! Concept records and the lifecycle state machine.
//!
//! A concept walks a one-directional download/install pipeline and then
//! oscillates between `Understood` and `NeedsReview` as evaluations land.
//! Once a concept has reached `Familiar` it never regresses below it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cortex_algo::{STRENGTH_MAX, STRENGTH_MIN};

/// Lifecycle phase of a concept for one learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConceptStatus {
    New,
    Familiar,
    Downloading,
    Downloaded,
    Installing,
    Understood,
    NeedsReview,
}

impl Default for ConceptStatus {
    fn default() -> Self {
        Self::New
    }
}

impl ConceptStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "FAMILIAR" => Self::Familiar,
            "DOWNLOADING" => Self::Downloading,
            "DOWNLOADED" => Self::Downloaded,
            "INSTALLING" => Self::Installing,
            "UNDERSTOOD" => Self::Understood,
            "NEEDS_REVIEW" => Self::NeedsReview,
            _ => Self::New,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Familiar => "FAMILIAR",
            Self::Downloading => "DOWNLOADING",
            Self::Downloaded => "DOWNLOADED",
            Self::Installing => "INSTALLING",
            Self::Understood => "UNDERSTOOD",
            Self::NeedsReview => "NEEDS_REVIEW",
        }
    }

    /// Position in the one-directional pipeline. `Understood` and
    /// `NeedsReview` share a rank: they oscillate rather than progress.
    fn rank(&self) -> u8 {
        match self {
            Self::New => 0,
            Self::Familiar => 1,
            Self::Downloading => 2,
            Self::Downloaded => 3,
            Self::Installing => 4,
            Self::Understood | Self::NeedsReview => 5,
        }
    }

    /// Only these statuses carry a meaningful strength and can be
    /// scheduled for review.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, Self::Understood | Self::NeedsReview)
    }

    /// Whether moving from `self` to `to` is a legal lifecycle step.
    ///
    /// Forward moves are always legal, `Understood <-> NeedsReview` is the
    /// only oscillation, and `NeedsReview` is reachable only from
    /// `Understood` (a failed review of a consolidated concept).
    pub fn can_transition_to(&self, to: ConceptStatus) -> bool {
        if *self == to {
            return true;
        }
        match (*self, to) {
            (Self::Understood, Self::NeedsReview) => true,
            (Self::NeedsReview, Self::Understood) => true,
            (_, Self::NeedsReview) => false,
            (from, to) => to.rank() > from.rank(),
        }
    }
}

/// Illegal lifecycle move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal status transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: ConceptStatus,
    pub to: ConceptStatus,
}

/// Per-learner state of one learnable concept.
///
/// `strength` is meaningful only in reviewable statuses; decay is a
/// read-time projection and never mutates the stored value. Identifiers
/// are immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRecord {
    pub concept_id: String,
    pub module_id: String,
    pub status: ConceptStatus,
    /// Memory strength in [0, 100]; 0 = fully forgotten.
    pub strength: f64,
    /// Set only when an evaluation outcome commits; monotonically
    /// non-decreasing.
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Learner-driven "struggled" marker; dominates scheduling priority
    /// until a passing review clears it.
    pub explicit_review_flag: bool,
}

impl ConceptRecord {
    pub fn new(concept_id: impl Into<String>, module_id: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            module_id: module_id.into(),
            status: ConceptStatus::New,
            strength: STRENGTH_MIN,
            last_reviewed: None,
            explicit_review_flag: false,
        }
    }

    /// Whether the record is sane enough to schedule. Corrupt records
    /// are excluded from candidate lists, never turned into errors.
    pub fn is_valid_for_scheduling(&self) -> bool {
        self.status.is_reviewable()
            && self.strength.is_finite()
            && (STRENGTH_MIN..=STRENGTH_MAX).contains(&self.strength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        use ConceptStatus::*;
        assert!(New.can_transition_to(Familiar));
        assert!(Familiar.can_transition_to(Downloading));
        assert!(Downloading.can_transition_to(Downloaded));
        assert!(Downloaded.can_transition_to(Installing));
        assert!(Installing.can_transition_to(Understood));
        // Skipping ahead is still forward.
        assert!(Familiar.can_transition_to(Understood));
    }

    #[test]
    fn test_no_regression_below_familiar() {
        use ConceptStatus::*;
        assert!(!Familiar.can_transition_to(New));
        assert!(!Understood.can_transition_to(Familiar));
        assert!(!NeedsReview.can_transition_to(Downloading));
        assert!(!Downloaded.can_transition_to(Downloading));
    }

    #[test]
    fn test_review_oscillation() {
        use ConceptStatus::*;
        assert!(Understood.can_transition_to(NeedsReview));
        assert!(NeedsReview.can_transition_to(Understood));
        // NeedsReview is only reachable through Understood.
        assert!(!Installing.can_transition_to(NeedsReview));
        assert!(!New.can_transition_to(NeedsReview));
    }

    #[test]
    fn test_reviewable_statuses() {
        use ConceptStatus::*;
        assert!(Understood.is_reviewable());
        assert!(NeedsReview.is_reviewable());
        assert!(!New.is_reviewable());
        assert!(!Installing.is_reviewable());
    }

    #[test]
    fn test_scheduling_validity() {
        let mut record = ConceptRecord::new("c1", "m1");
        assert!(!record.is_valid_for_scheduling());

        record.status = ConceptStatus::Understood;
        record.strength = 50.0;
        assert!(record.is_valid_for_scheduling());

        record.strength = f64::NAN;
        assert!(!record.is_valid_for_scheduling());

        record.strength = 120.0;
        assert!(!record.is_valid_for_scheduling());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ConceptStatus::New,
            ConceptStatus::Familiar,
            ConceptStatus::Downloading,
            ConceptStatus::Downloaded,
            ConceptStatus::Installing,
            ConceptStatus::Understood,
            ConceptStatus::NeedsReview,
        ] {
            assert_eq!(ConceptStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_record_serde_camel_case() {
        let record = ConceptRecord::new("c1", "m1");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"conceptId\""));
        assert!(json.contains("\"explicitReviewFlag\""));
        assert!(json.contains("\"NEW\""));
    }
}
