//! Adaptive review engine: concept lifecycle, due-date scheduling, and
//! evaluation-driven strength updates for a gamified learning product.
//!
//! The pure memory math lives in [`cortex_algo`]; this crate owns the
//! stateful parts: the concept record store abstraction, the ranked
//! review scheduler, the session walk over a prioritized queue, and the
//! integrator that commits evaluation outcomes atomically.

pub mod concept;
pub mod config;
pub mod evaluator;
pub mod integrator;
pub mod logging;
pub mod scheduler;
pub mod session;
pub mod store;

pub use cortex_algo as algo;

pub use concept::{ConceptRecord, ConceptStatus};
pub use config::{EngineConfig, LoggingConfig, PriorityWeights};
pub use evaluator::{EvaluationOutcome, Evaluator, EvaluatorError, ScriptedEvaluator};
pub use scheduler::{CandidateSummary, CandidateView, ReviewCandidate, ReviewScheduler};
pub use session::{ReviewSession, SessionError, SessionKind, SessionService, SessionStart, SessionState};
pub use store::{ConceptStore, MemoryStore, RecordPatch, StoreError};
