//! Due-date computation and priority ranking of review candidates.
//!
//! Candidates are derived fresh on every pass from a record snapshot plus
//! "now"; nothing here is persisted. One corrupt record is skipped with a
//! warning rather than failing the whole pass.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cortex_algo::{decay, due_interval_hours, MemoryParams, STRENGTH_MIN};

use crate::concept::ConceptRecord;
use crate::config::{EngineConfig, PriorityWeights};
use crate::store::ConceptStore;

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Filter applied on top of the ranked list; the ranking itself is the
/// same for every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateView {
    /// Due within the next seven days.
    Upcoming,
    /// Due right now.
    Overdue,
    All,
}

/// Scheduling projection of a concept record. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCandidate {
    pub concept_id: String,
    pub module_id: String,
    /// Decay-projected strength at "now".
    pub current_strength: f64,
    pub due_at: DateTime<Utc>,
    pub is_due: bool,
    pub is_due_today: bool,
    pub is_due_this_week: bool,
    pub priority: f64,
}

/// Aggregate counts for dashboard display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub due_today_count: usize,
    pub due_this_week_count: usize,
    pub total_eligible_count: usize,
}

/// Ranks eligible concept records into a prioritized candidate list.
#[derive(Debug, Clone)]
pub struct ReviewScheduler {
    memory: MemoryParams,
    priority: PriorityWeights,
}

impl ReviewScheduler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            memory: config.memory.clone(),
            priority: config.priority.clone(),
        }
    }

    /// Project one record into a candidate, or `None` when the record is
    /// not in schedulable shape.
    ///
    /// Never-reviewed concepts are immediately due and enter the priority
    /// formula with strength 0, which guarantees they rank highly. A
    /// flagged concept is forced due regardless of its interval.
    pub fn project(&self, record: &ConceptRecord, now: DateTime<Utc>) -> Option<ReviewCandidate> {
        if !record.is_valid_for_scheduling() {
            warn!(
                concept_id = %record.concept_id,
                status = record.status.as_str(),
                strength = record.strength,
                "skipping concept with invalid record"
            );
            return None;
        }

        let (current_strength, due_at) = match record.last_reviewed {
            Some(last) => {
                let elapsed_days =
                    (now - last).num_seconds().max(0) as f64 / SECONDS_PER_DAY;
                let projected = decay(record.strength, elapsed_days, &self.memory);
                let interval = due_interval_hours(record.strength, &self.memory);
                let due_at = last + Duration::seconds((interval * SECONDS_PER_HOUR) as i64);
                (projected, due_at)
            }
            // Never reviewed: no decay baseline exists, due immediately.
            None => (STRENGTH_MIN, now),
        };

        // A learner flag overrides the computed due date: the concept is
        // due right now even if its interval has not elapsed.
        let due_at = if record.explicit_review_flag {
            due_at.min(now)
        } else {
            due_at
        };

        let hours_overdue =
            ((now - due_at).num_seconds() as f64 / SECONDS_PER_HOUR).max(0.0);
        let flag_bonus = if record.explicit_review_flag {
            self.priority.explicit_flag_bonus
        } else {
            0.0
        };
        let priority = flag_bonus
            + hours_overdue.min(self.priority.overdue_cap_hours)
            + self.priority.strength_deficit_scale * (100.0 - current_strength);

        Some(ReviewCandidate {
            concept_id: record.concept_id.clone(),
            module_id: record.module_id.clone(),
            current_strength,
            due_at,
            is_due: due_at <= now,
            is_due_today: due_at <= end_of_today(now),
            is_due_this_week: due_at <= now + Duration::days(7),
            priority,
        })
    }

    /// Rank a batch of records by descending priority, ties broken by
    /// concept id for determinism.
    pub fn rank(&self, records: &[ConceptRecord], now: DateTime<Utc>) -> Vec<ReviewCandidate> {
        let mut candidates: Vec<ReviewCandidate> = records
            .iter()
            .filter_map(|record| self.project(record, now))
            .collect();
        candidates.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.concept_id.cmp(&b.concept_id))
        });
        candidates
    }

    /// Ranked candidates for one view over the store's eligible records.
    pub fn candidates<S: ConceptStore + ?Sized>(
        &self,
        store: &S,
        view: CandidateView,
        now: DateTime<Utc>,
    ) -> Vec<ReviewCandidate> {
        let records = store.list_eligible();
        let ranked = self.rank(&records, now);
        debug!(
            eligible = records.len(),
            ranked = ranked.len(),
            view = ?view,
            "scheduling pass"
        );
        match view {
            CandidateView::All => ranked,
            CandidateView::Overdue => ranked.into_iter().filter(|c| c.is_due).collect(),
            CandidateView::Upcoming => {
                ranked.into_iter().filter(|c| c.is_due_this_week).collect()
            }
        }
    }

    /// Aggregate counts over all eligible records.
    pub fn summary<S: ConceptStore + ?Sized>(
        &self,
        store: &S,
        now: DateTime<Utc>,
    ) -> CandidateSummary {
        let ranked = self.candidates(store, CandidateView::All, now);
        CandidateSummary {
            due_today_count: ranked.iter().filter(|c| c.is_due_today).count(),
            due_this_week_count: ranked.iter().filter(|c| c.is_due_this_week).count(),
            total_eligible_count: ranked.len(),
        }
    }
}

fn end_of_today(now: DateTime<Utc>) -> DateTime<Utc> {
    match now.date_naive().and_hms_milli_opt(23, 59, 59, 999) {
        Some(t) => Utc.from_utc_datetime(&t),
        None => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::ConceptStatus;
    use crate::store::MemoryStore;

    fn scheduler() -> ReviewScheduler {
        ReviewScheduler::new(&EngineConfig::default())
    }

    fn record(
        concept_id: &str,
        strength: f64,
        reviewed_hours_ago: i64,
        now: DateTime<Utc>,
    ) -> ConceptRecord {
        ConceptRecord {
            status: ConceptStatus::Understood,
            strength,
            last_reviewed: Some(now - Duration::hours(reviewed_hours_ago)),
            ..ConceptRecord::new(concept_id, "m1")
        }
    }

    #[test]
    fn test_due_when_interval_elapsed() {
        let now = Utc::now();
        // strength 50 -> 48h interval, reviewed exactly 48h ago
        let candidate = scheduler().project(&record("c1", 50.0, 48, now), now).unwrap();
        assert!(candidate.is_due);
        assert!(candidate.is_due_this_week);
    }

    #[test]
    fn test_not_due_before_interval() {
        let now = Utc::now();
        // strength 95 -> 336h interval
        let candidate = scheduler().project(&record("c1", 95.0, 10, now), now).unwrap();
        assert!(!candidate.is_due);
    }

    #[test]
    fn test_never_reviewed_is_immediately_due() {
        let now = Utc::now();
        let mut rec = ConceptRecord::new("c1", "m1");
        rec.status = ConceptStatus::Understood;
        rec.strength = 60.0;
        let candidate = scheduler().project(&rec, now).unwrap();
        assert!(candidate.is_due);
        assert_eq!(candidate.current_strength, 0.0);
        // flagless, zero overdue: priority is the full strength deficit
        assert_eq!(candidate.priority, 100.0);
    }

    #[test]
    fn test_decay_projection() {
        let now = Utc::now();
        // strength 10 reviewed 30h ago: rate 5/day -> current ~3.75
        let candidate = scheduler().project(&record("c1", 10.0, 30, now), now).unwrap();
        assert!((candidate.current_strength - 3.75).abs() < 0.01);
    }

    #[test]
    fn test_explicit_flag_dominates() {
        let now = Utc::now();
        let mut flagged = record("a-flagged", 50.0, 48, now);
        flagged.explicit_review_flag = true;
        let unflagged = record("b-plain", 50.0, 48, now);

        let ranked = scheduler().rank(&[unflagged, flagged], now);
        assert_eq!(ranked[0].concept_id, "a-flagged");
        assert!(ranked[0].priority >= ranked[1].priority + 199.0);
    }

    #[test]
    fn test_flag_forces_dueness_before_interval() {
        let now = Utc::now();
        // strength 95 -> 336h interval, reviewed 1h ago: nowhere near due.
        let mut flagged = record("flagged", 95.0, 1, now);
        flagged.explicit_review_flag = true;

        let candidate = scheduler().project(&flagged, now).unwrap();
        assert!(candidate.is_due);
        assert!(candidate.is_due_today);

        let store = MemoryStore::new();
        store.set_module_installed("m1", true);
        store.upsert(flagged);
        let overdue = scheduler().candidates(&store, CandidateView::Overdue, now);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].concept_id, "flagged");
    }

    #[test]
    fn test_overdue_hours_are_capped() {
        let now = Utc::now();
        // Reviewed ages ago: overdue far beyond the 200h cap.
        let stale = scheduler().project(&record("c1", 50.0, 24 * 365, now), now).unwrap();
        let max_unflagged = 200.0 + 100.0;
        assert!(stale.priority <= max_unflagged);
    }

    #[test]
    fn test_ties_break_by_concept_id() {
        let now = Utc::now();
        let ranked = scheduler().rank(
            &[record("b", 50.0, 48, now), record("a", 50.0, 48, now)],
            now,
        );
        assert_eq!(ranked[0].concept_id, "a");
        assert_eq!(ranked[1].concept_id, "b");
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let now = Utc::now();
        let mut bad = record("bad", 50.0, 48, now);
        bad.strength = f64::NAN;
        let good = record("good", 50.0, 48, now);

        let ranked = scheduler().rank(&[bad, good], now);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].concept_id, "good");
    }

    #[test]
    fn test_views_filter_the_same_ranking() {
        let now = Utc::now();
        let store = MemoryStore::new();
        store.set_module_installed("m1", true);
        store.upsert(record("due", 50.0, 72, now));
        store.upsert(record("later", 95.0, 1, now));

        let scheduler = scheduler();
        let all = scheduler.candidates(&store, CandidateView::All, now);
        let overdue = scheduler.candidates(&store, CandidateView::Overdue, now);
        assert_eq!(all.len(), 2);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].concept_id, "due");
    }

    #[test]
    fn test_never_reviewed_shows_in_overdue_view() {
        let now = Utc::now();
        let store = MemoryStore::new();
        store.set_module_installed("m1", true);
        let mut rec = ConceptRecord::new("fresh", "m1");
        rec.status = ConceptStatus::Understood;
        store.upsert(rec);

        let overdue = scheduler().candidates(&store, CandidateView::Overdue, now);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].concept_id, "fresh");
    }

    #[test]
    fn test_summary_counts() {
        let now = Utc::now();
        let store = MemoryStore::new();
        store.set_module_installed("m1", true);
        store.upsert(record("due-now", 50.0, 72, now));
        store.upsert(record("due-week", 80.0, 100, now)); // 168h interval
        store.upsert(record("due-far", 95.0, 1, now)); // 336h interval

        let summary = scheduler().summary(&store, now);
        assert_eq!(summary.total_eligible_count, 3);
        assert_eq!(summary.due_today_count, 1);
        assert_eq!(summary.due_this_week_count, 2);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let now = Utc::now();
        let rec = record("c1", 42.0, 30, now);
        let scheduler = scheduler();
        assert_eq!(
            scheduler.project(&rec, now),
            scheduler.project(&rec, now)
        );
    }
}
