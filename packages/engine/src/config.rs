//! Engine configuration.
//!
//! All tuned constants are configurable; the defaults are the canonical
//! tuning. Env overrides follow the same pattern as the rest of the
//! deployment surface: missing or unparsable values fall back silently.

use serde::{Deserialize, Serialize};

use cortex_algo::{MemoryParams, ModeWeights};

/// Weights of the candidate priority formula:
/// `priority = flag_bonus + min(hours_overdue, cap) + deficit_scale * (100 - strength)`.
///
/// The flag bonus dominates both other terms so learner-flagged concepts
/// always surface first; the overdue cap stops extremely stale items from
/// drowning out everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub explicit_flag_bonus: f64,
    pub overdue_cap_hours: f64,
    pub strength_deficit_scale: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            explicit_flag_bonus: 200.0,
            overdue_cap_hours: 200.0,
            strength_deficit_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub enable_file_logs: bool,
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_file_logs: false,
            dir: "./logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub memory: MemoryParams,
    pub priority: PriorityWeights,
    pub modes: ModeWeights,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory: MemoryParams::default(),
            priority: PriorityWeights::default(),
            modes: ModeWeights::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("REVIEW_FLAG_BONUS") {
            config.priority.explicit_flag_bonus =
                val.parse().unwrap_or(config.priority.explicit_flag_bonus);
        }
        if let Ok(val) = std::env::var("REVIEW_OVERDUE_CAP_HOURS") {
            config.priority.overdue_cap_hours =
                val.parse().unwrap_or(config.priority.overdue_cap_hours);
        }
        if let Ok(val) = std::env::var("REVIEW_DEFICIT_SCALE") {
            config.priority.strength_deficit_scale =
                val.parse().unwrap_or(config.priority.strength_deficit_scale);
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            config.logging.level = val;
        }
        if let Ok(val) = std::env::var("ENABLE_FILE_LOGS") {
            config.logging.enable_file_logs = val == "true" || val == "1";
        }
        if let Ok(val) = std::env::var("LOG_DIR") {
            config.logging.dir = val;
        }

        config
    }
}
