//! Driver ranking scores for a dispatch platform.
//!
//! Monthly scores fold a driver's work rate, feedback and cancellations into
//! their running average; biannual normalization re-spreads the whole pool
//! over evenly spaced rank values.

pub mod activity;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod request;
pub mod roster;
pub mod scoring;

pub use metrics::{DriverMetrics, Feedback};
pub use request::{handle_request, respond, Request, Response};
pub use scoring::{
    calculate_batch, calculate_score, normalize_rankings, ScoreMode, ScoringConfig, ScoringError,
};
