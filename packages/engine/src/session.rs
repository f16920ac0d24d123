//! Review session orchestration.
//!
//! A session is one bounded, process-local walk over a ranked queue of
//! concepts. Each queued item carries a pre-assigned interaction mode.
//! The cursor advances strictly sequentially; every item's outcome
//! commits independently, so abandoning a session mid-queue needs no
//! rollback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use cortex_algo::{InteractionMode, MemoryParams, ModeSampler};

use crate::concept::ConceptRecord;
use crate::config::EngineConfig;
use crate::evaluator::{EvaluationOutcome, Evaluator, EvaluatorError};
use crate::integrator::integrate_outcome;
use crate::scheduler::{CandidateView, ReviewScheduler};
use crate::store::{ConceptStore, StoreError};

/// Which candidates seed the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Due items only, in priority order.
    Standard,
    /// Every eligible item regardless of due date, in priority order.
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Exhausted,
}

/// One queued concept plus the interaction mode chosen for it.
#[derive(Debug, Clone)]
pub struct SessionItem {
    pub record: ConceptRecord,
    pub mode: InteractionMode,
}

/// Ephemeral session state; discarded on exit or exhaustion, never
/// persisted.
#[derive(Debug)]
pub struct ReviewSession {
    pub session_id: Uuid,
    pub kind: SessionKind,
    items: Vec<SessionItem>,
    cursor: usize,
    state: SessionState,
}

impl ReviewSession {
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The concept currently under review, if the session is active.
    pub fn current(&self) -> Option<&SessionItem> {
        if self.state != SessionState::Active {
            return None;
        }
        self.items.get(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.cursor)
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.items.len() {
            self.state = SessionState::Exhausted;
        }
    }
}

/// Result of asking for a session: an empty queue is "nothing to review",
/// not an error.
#[derive(Debug)]
pub enum SessionStart {
    Started(ReviewSession),
    NothingDue,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session item")]
    NotActive,
    #[error("evaluation unavailable: {0}")]
    Evaluation(#[from] EvaluatorError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Builds sessions from a store and integrates outcomes back into it.
pub struct SessionService<S> {
    store: Arc<S>,
    scheduler: ReviewScheduler,
    memory: MemoryParams,
    sampler: Mutex<ModeSampler>,
}

impl<S: ConceptStore> SessionService<S> {
    pub fn new(store: Arc<S>, config: &EngineConfig) -> Self {
        Self {
            store,
            scheduler: ReviewScheduler::new(config),
            memory: config.memory.clone(),
            sampler: Mutex::new(ModeSampler::new(config.modes.clone())),
        }
    }

    /// Same as [`SessionService::new`] but with a fixed RNG seed so mode
    /// assignment is reproducible in tests.
    pub fn with_seed(store: Arc<S>, config: &EngineConfig, seed: u64) -> Self {
        Self {
            store,
            scheduler: ReviewScheduler::new(config),
            memory: config.memory.clone(),
            sampler: Mutex::new(ModeSampler::with_seed(config.modes.clone(), seed)),
        }
    }

    pub fn scheduler(&self) -> &ReviewScheduler {
        &self.scheduler
    }

    /// Build a session queue from the current candidate ranking.
    ///
    /// An empty queue never enters `Active`; callers get `NothingDue`.
    pub fn start_session(&self, kind: SessionKind, now: DateTime<Utc>) -> SessionStart {
        let view = match kind {
            SessionKind::Standard => CandidateView::Overdue,
            SessionKind::Manual => CandidateView::All,
        };
        let candidates = self.scheduler.candidates(self.store.as_ref(), view, now);

        let mut sampler = self.sampler.lock();
        let items: Vec<SessionItem> = candidates
            .iter()
            .filter_map(|candidate| {
                // Snapshot the record fresh; a candidate may be stale if
                // the store changed since the scheduling pass.
                let record = self.store.get(&candidate.concept_id)?;
                Some(SessionItem {
                    record,
                    mode: sampler.next_mode(),
                })
            })
            .collect();

        if items.is_empty() {
            info!(kind = ?kind, "nothing to review");
            return SessionStart::NothingDue;
        }

        let session = ReviewSession {
            session_id: Uuid::new_v4(),
            kind,
            cursor: 0,
            state: SessionState::Active,
            items,
        };
        info!(
            session_id = %session.session_id,
            kind = ?kind,
            queue_len = session.len(),
            "review session started"
        );
        SessionStart::Started(session)
    }

    /// Integrate an already-scored outcome for the current item, commit
    /// it atomically, then advance the cursor.
    ///
    /// On any error the cursor does not move and the record is untouched,
    /// so the learner can retry the same item.
    pub fn submit_outcome(
        &self,
        session: &mut ReviewSession,
        outcome: EvaluationOutcome,
        now: DateTime<Utc>,
    ) -> Result<ConceptRecord, SessionError> {
        let item = session.current().ok_or(SessionError::NotActive)?;
        let patch = integrate_outcome(&item.record, &outcome, now, &self.memory);
        let updated = self.store.commit(&item.record.concept_id, patch)?;

        info!(
            session_id = %session.session_id,
            concept_id = %updated.concept_id,
            score = outcome.score,
            is_pass = outcome.is_pass,
            strength = updated.strength,
            status = updated.status.as_str(),
            "review outcome committed"
        );
        session.advance();
        if session.state() == SessionState::Exhausted {
            info!(session_id = %session.session_id, "session queue exhausted");
        }
        Ok(updated)
    }

    /// Score the learner's response through the external evaluator, then
    /// commit the outcome. Evaluator failure is retryable: it leaves both
    /// the cursor and the record exactly as they were.
    pub async fn submit_response<E: Evaluator>(
        &self,
        session: &mut ReviewSession,
        evaluator: &E,
        learner_response: &str,
        now: DateTime<Utc>,
    ) -> Result<ConceptRecord, SessionError> {
        let (concept_id, mode) = {
            let item = session.current().ok_or(SessionError::NotActive)?;
            (item.record.concept_id.clone(), item.mode)
        };

        let outcome = match evaluator.evaluate(&concept_id, learner_response, mode).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    session_id = %session.session_id,
                    concept_id = %concept_id,
                    error = %err,
                    "evaluation failed, item left un-advanced"
                );
                return Err(err.into());
            }
        };
        self.submit_outcome(session, outcome, now)
    }

    /// Abandon the rest of the queue. Already-committed items stay
    /// committed; there is no multi-item transaction to roll back.
    pub fn exit(&self, session: &mut ReviewSession) {
        if session.state == SessionState::Active {
            info!(
                session_id = %session.session_id,
                abandoned = session.remaining(),
                "review session exited early"
            );
        }
        session.state = SessionState::Idle;
    }
}
