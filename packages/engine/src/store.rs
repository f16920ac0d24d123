//! Concept record storage.
//!
//! The engine only ever talks to the narrow [`ConceptStore`] trait;
//! persistence technology is the host application's business. Commits are
//! atomic per record: a patch applies in full or not at all, so a review
//! can never leave strength updated while status reads stale.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cortex_algo::{STRENGTH_MAX, STRENGTH_MIN};

use crate::concept::{ConceptRecord, ConceptStatus, TransitionError};

/// Atomic update for one concept record. `None` fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    pub strength: Option<f64>,
    pub status: Option<ConceptStatus>,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub explicit_review_flag: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("concept not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    IllegalTransition(#[from] TransitionError),
    #[error("lastReviewed must not move backwards for concept {0}")]
    StaleReview(String),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Narrow storage interface consumed by the scheduler and session layers.
pub trait ConceptStore: Send + Sync {
    /// Records in a reviewable status belonging to installed modules.
    fn list_eligible(&self) -> Vec<ConceptRecord>;

    fn get(&self, concept_id: &str) -> Option<ConceptRecord>;

    /// Apply `patch` atomically and return the updated record.
    ///
    /// Implementations must reject illegal status transitions and any
    /// attempt to move `last_reviewed` backwards.
    fn commit(&self, concept_id: &str, patch: RecordPatch) -> Result<ConceptRecord, StoreError>;
}

/// In-memory [`ConceptStore`] used by tests and embedding hosts that keep
/// their own persistence outside the engine.
///
/// Module install state is plain bookkeeping here: reviewing is only
/// defined for fully installed modules, and the host tells the store which
/// modules those are.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, ConceptRecord>>,
    installed_modules: RwLock<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record wholesale. Lifecycle rules are not
    /// checked here; use [`MemoryStore::advance_status`] for guarded moves.
    pub fn upsert(&self, record: ConceptRecord) {
        self.records
            .write()
            .insert(record.concept_id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn set_module_installed(&self, module_id: &str, installed: bool) {
        let mut modules = self.installed_modules.write();
        if installed {
            modules.insert(module_id.to_string());
        } else {
            modules.remove(module_id);
        }
    }

    pub fn is_module_installed(&self, module_id: &str) -> bool {
        self.installed_modules.read().contains(module_id)
    }

    /// Move a concept along its lifecycle, enforcing the one-directional
    /// transition rules. Strength is seeded at 0 when a concept is
    /// created, so no extra seeding happens on `Familiar`.
    pub fn advance_status(
        &self,
        concept_id: &str,
        status: ConceptStatus,
    ) -> Result<ConceptRecord, StoreError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(concept_id)
            .ok_or_else(|| StoreError::NotFound(concept_id.to_string()))?;
        if !record.status.can_transition_to(status) {
            return Err(TransitionError {
                from: record.status,
                to: status,
            }
            .into());
        }
        record.status = status;
        debug!(concept_id, status = status.as_str(), "concept status advanced");
        Ok(record.clone())
    }

    /// Learner marked the concept as "struggled": force it onto the
    /// review radar regardless of its computed due date.
    pub fn flag_for_review(&self, concept_id: &str) -> Result<ConceptRecord, StoreError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(concept_id)
            .ok_or_else(|| StoreError::NotFound(concept_id.to_string()))?;
        record.explicit_review_flag = true;
        Ok(record.clone())
    }
}

impl ConceptStore for MemoryStore {
    fn list_eligible(&self) -> Vec<ConceptRecord> {
        let modules = self.installed_modules.read();
        self.records
            .read()
            .values()
            .filter(|r| r.status.is_reviewable() && modules.contains(&r.module_id))
            .cloned()
            .collect()
    }

    fn get(&self, concept_id: &str) -> Option<ConceptRecord> {
        self.records.read().get(concept_id).cloned()
    }

    fn commit(&self, concept_id: &str, patch: RecordPatch) -> Result<ConceptRecord, StoreError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(concept_id)
            .ok_or_else(|| StoreError::NotFound(concept_id.to_string()))?;

        // Validate the whole patch before touching anything.
        if let Some(status) = patch.status {
            if !record.status.can_transition_to(status) {
                return Err(TransitionError {
                    from: record.status,
                    to: status,
                }
                .into());
            }
        }
        if let Some(reviewed) = patch.last_reviewed {
            if let Some(previous) = record.last_reviewed {
                if reviewed < previous {
                    return Err(StoreError::StaleReview(concept_id.to_string()));
                }
            }
        }
        if let Some(strength) = patch.strength {
            if !strength.is_finite() || !(STRENGTH_MIN..=STRENGTH_MAX).contains(&strength) {
                return Err(StoreError::Validation(format!(
                    "strength {strength} out of range for concept {concept_id}"
                )));
            }
        }

        if let Some(strength) = patch.strength {
            record.strength = strength;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(reviewed) = patch.last_reviewed {
            record.last_reviewed = Some(reviewed);
        }
        if let Some(flag) = patch.explicit_review_flag {
            record.explicit_review_flag = flag;
        }
        debug!(concept_id, "record patch committed");
        Ok(record.clone())
    }
}
