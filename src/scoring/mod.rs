pub mod config;
pub mod engine;
pub mod error;
pub mod factors;
pub mod normalize;
pub mod validation;

pub use config::*;
pub use engine::{
    calculate_batch, calculate_monthly, calculate_score, round_to, FactorContribution,
    ScoreBreakdown, ScoreMode, ScoreResult,
};
pub use error::ScoringError;
pub use factors::{monthly_contribution, Factor};
pub use normalize::{descending_ranks, normalize_rankings, rank_to_score};
pub use validation::{validate_scoring, RankContext};
