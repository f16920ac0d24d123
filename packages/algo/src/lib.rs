//! # cortex-algo - core review-scheduling algorithms
//!
//! Pure Rust implementations of the memory math behind the adaptive
//! review scheduler:
//!
//! - **Memory decay** - tiered forgetting curve over a 0-100 strength scale
//! - **Due intervals** - strength tier to review-interval mapping
//! - **Strength deltas** - asymmetric reward/penalty for review outcomes
//! - **Mode sampling** - weighted choice of the review interaction mode
//!
//! Design goals:
//! - **Pure** - no I/O, no clocks; callers pass elapsed time explicitly
//! - **Deterministic** - randomized sampling takes a seedable RNG
//! - **Configurable** - every tuned constant lives in a params struct
//!   whose `Default` is the canonical tuning
//!
//! Module structure:
//! - [`memory`] - decay, due intervals, strength deltas
//! - [`modes`] - weighted interaction-mode sampling
//! - [`types`] - shared params structs and constants

pub mod memory;
pub mod modes;
pub mod types;

pub use memory::{decay, due_interval_hours, strength_delta};
pub use modes::{choose_mode, InteractionMode, ModeSampler};
pub use types::{MemoryParams, ModeWeights, STRENGTH_MAX, STRENGTH_MIN};
