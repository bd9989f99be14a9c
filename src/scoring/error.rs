use thiserror::Error;

/// Errors raised by the scoring engine and the request layer in front of it.
///
/// Every variant is a rejected request: callers must surface it rather than
/// fall back to a default score.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Periodic normalization was requested without both `totalDrivers` and `driverRank`
    #[error("totalDrivers and driverRank are required for biannual normalization")]
    MissingParameter,

    /// The rank context does not describe a position inside the driver pool
    #[error("driverRank {driver_rank} is outside 1..={total_drivers} (totalDrivers must be at least 1)")]
    InvalidRank { total_drivers: i64, driver_rank: i64 },

    /// Feedback values are +1 (good) or -1 (bad)
    #[error("feedback value must be 1 or -1, got {0}")]
    InvalidFeedback(i64),

    /// The request body could not be decoded
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ScoringError {
    /// Stable kind string reported to callers alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::MissingParameter => "MissingParameter",
            ScoringError::InvalidRank { .. } => "InvalidRank",
            ScoringError::InvalidFeedback(_) => "InvalidFeedback",
            ScoringError::InvalidRequest(_) => "InvalidRequest",
        }
    }
}
