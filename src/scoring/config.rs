use serde::{Deserialize, Serialize};

pub const DEFAULT_WORK_RATE_WEIGHT: f64 = 1.5;
pub const DEFAULT_FEEDBACK_WEIGHT: f64 = 1.0;
pub const DEFAULT_CANCELLATION_WEIGHT: f64 = 2.0;
pub const DEFAULT_PRECISION: u32 = 2;
pub const DEFAULT_MAX_WORK_RATE: f64 = 31.0;

/// Main scoring configuration.
///
/// Weights of the monthly contribution and the rounding precision of every
/// score the engine returns. Each field is optional; an absent field falls
/// back to the built-in default.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   work_rate: 1.5
///   feedback: 1.0
///   cancellation: 2.0
///   precision: 2
///   max_work_rate: 31
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weight applied to days worked in the period (default: 1.5)
    #[serde(default)]
    pub work_rate: Option<f64>,

    /// Weight applied to the signed feedback sum (default: 1.0)
    #[serde(default)]
    pub feedback: Option<f64>,

    /// Penalty per cancellation, subtracted from the contribution (default: 2.0)
    #[serde(default)]
    pub cancellation: Option<f64>,

    /// Decimal places every score is rounded to (default: 2)
    #[serde(default)]
    pub precision: Option<u32>,

    /// Cap applied when a completed job bumps the work rate (default: 31)
    #[serde(default)]
    pub max_work_rate: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            work_rate: Some(DEFAULT_WORK_RATE_WEIGHT),
            feedback: Some(DEFAULT_FEEDBACK_WEIGHT),
            cancellation: Some(DEFAULT_CANCELLATION_WEIGHT),
            precision: Some(DEFAULT_PRECISION),
            max_work_rate: Some(DEFAULT_MAX_WORK_RATE),
        }
    }
}

impl ScoringConfig {
    pub fn work_rate_weight(&self) -> f64 {
        self.work_rate.unwrap_or(DEFAULT_WORK_RATE_WEIGHT)
    }

    pub fn feedback_weight(&self) -> f64 {
        self.feedback.unwrap_or(DEFAULT_FEEDBACK_WEIGHT)
    }

    pub fn cancellation_weight(&self) -> f64 {
        self.cancellation.unwrap_or(DEFAULT_CANCELLATION_WEIGHT)
    }

    pub fn precision(&self) -> u32 {
        self.precision.unwrap_or(DEFAULT_PRECISION)
    }

    pub fn max_work_rate(&self) -> f64 {
        self.max_work_rate.unwrap_or(DEFAULT_MAX_WORK_RATE)
    }
}
