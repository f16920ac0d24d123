//! Evaluator boundary.
//!
//! Scoring a learner response is an external network round-trip to a
//! language model and the only suspending operation in the review
//! pipeline. The engine consumes this narrow interface; a failed or
//! timed-out evaluation must never mutate a concept record.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use cortex_algo::InteractionMode;

/// Verdict produced by the external evaluator for one learner response.
///
/// Scores are nominally 0-100 but the upstream model is noisy; consumers
/// clamp rather than reject out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub score: i32,
    pub is_pass: bool,
}

impl EvaluationOutcome {
    pub fn pass(score: i32) -> Self {
        Self { score, is_pass: true }
    }

    pub fn fail(score: i32) -> Self {
        Self { score, is_pass: false }
    }
}

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("evaluator unavailable: {0}")]
    Unavailable(String),
    #[error("evaluation timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed evaluator response: {0}")]
    Malformed(String),
}

/// External scorer of free-text learner responses.
pub trait Evaluator: Send + Sync {
    fn evaluate(
        &self,
        concept_id: &str,
        learner_response: &str,
        mode: InteractionMode,
    ) -> impl Future<Output = Result<EvaluationOutcome, EvaluatorError>> + Send;
}

/// Deterministic evaluator replaying a pre-loaded script of results, in
/// order. Used by tests and the demo binary; an exhausted script reports
/// the evaluator as unavailable.
#[derive(Default)]
pub struct ScriptedEvaluator {
    script: Mutex<VecDeque<Result<EvaluationOutcome, EvaluatorError>>>,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pass(&self, score: i32) {
        self.script.lock().push_back(Ok(EvaluationOutcome::pass(score)));
    }

    pub fn push_fail(&self, score: i32) {
        self.script.lock().push_back(Ok(EvaluationOutcome::fail(score)));
    }

    pub fn push_error(&self, error: EvaluatorError) {
        self.script.lock().push_back(Err(error));
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl Evaluator for ScriptedEvaluator {
    fn evaluate(
        &self,
        concept_id: &str,
        _learner_response: &str,
        mode: InteractionMode,
    ) -> impl Future<Output = Result<EvaluationOutcome, EvaluatorError>> + Send {
        let next = self.script.lock().pop_front();
        let concept_id = concept_id.to_string();
        async move {
            debug!(concept_id = %concept_id, mode = mode.as_str(), "scripted evaluation");
            next.unwrap_or_else(|| {
                Err(EvaluatorError::Unavailable("script exhausted".to_string()))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replay_in_order() {
        let evaluator = ScriptedEvaluator::new();
        evaluator.push_pass(92);
        evaluator.push_fail(35);

        let first = evaluator
            .evaluate("c1", "answer", InteractionMode::Probe)
            .await
            .unwrap();
        assert_eq!(first, EvaluationOutcome::pass(92));

        let second = evaluator
            .evaluate("c1", "answer", InteractionMode::Explain)
            .await
            .unwrap();
        assert_eq!(second, EvaluationOutcome::fail(35));
    }

    #[tokio::test]
    async fn test_exhausted_script_is_unavailable() {
        let evaluator = ScriptedEvaluator::new();
        let result = evaluator
            .evaluate("c1", "answer", InteractionMode::Probe)
            .await;
        assert!(matches!(result, Err(EvaluatorError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_scripted_error_surfaces() {
        let evaluator = ScriptedEvaluator::new();
        evaluator.push_error(EvaluatorError::Timeout(Duration::from_secs(30)));
        let result = evaluator
            .evaluate("c1", "answer", InteractionMode::Probe)
            .await;
        assert!(matches!(result, Err(EvaluatorError::Timeout(_))));
    }
}
