use serde::{Deserialize, Serialize};

use crate::scoring::{calculate_monthly, ScoringConfig, ScoringError};

/// Wire names of the four metric fields.
pub const METRIC_FIELDS: [&str; 4] = ["workRate", "feedbackRate", "cancellationRate", "averageRate"];

/// One evaluation period's raw inputs for one driver.
///
/// On the wire the fields are camelCase and the current average is named
/// `averageRate`. Missing fields read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverMetrics {
    /// Days worked in the period (expected 0-31)
    #[serde(default)]
    pub work_rate: f64,
    /// Sum of feedback scores (+1 good, -1 bad)
    #[serde(default)]
    pub feedback_rate: f64,
    /// Number of cancellations; the sign is ignored when scoring
    #[serde(default)]
    pub cancellation_rate: f64,
    /// Average carried over from the previous period
    #[serde(default, rename = "averageRate")]
    pub current_average: f64,
}

/// Rider feedback on a completed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Positive,
    Negative,
}

impl Feedback {
    pub fn value(self) -> f64 {
        match self {
            Feedback::Positive => 1.0,
            Feedback::Negative => -1.0,
        }
    }
}

impl TryFrom<i64> for Feedback {
    type Error = ScoringError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Feedback::Positive),
            -1 => Ok(Feedback::Negative),
            other => Err(ScoringError::InvalidFeedback(other)),
        }
    }
}

impl DriverMetrics {
    pub fn new(work_rate: f64, feedback_rate: f64, cancellation_rate: f64, current_average: f64) -> Self {
        Self {
            work_rate,
            feedback_rate,
            cancellation_rate,
            current_average,
        }
    }

    /// Count one more day of work, capped at `max_work_rate`.
    pub fn record_completed_job(&mut self, max_work_rate: f64) {
        self.work_rate = (self.work_rate + 1.0).min(max_work_rate);
    }

    pub fn record_feedback(&mut self, feedback: Feedback) {
        self.feedback_rate += feedback.value();
    }

    pub fn record_cancellation(&mut self) {
        self.cancellation_rate += 1.0;
    }

    /// Replace the work rate with a counted number of work days. Not capped.
    pub fn with_work_days(self, days: u32) -> Self {
        Self {
            work_rate: f64::from(days),
            ..self
        }
    }

    /// Fold this period's activity into the average: the returned metrics carry
    /// the monthly score as their new `current_average`.
    pub fn rescore(self, config: &ScoringConfig) -> Self {
        Self {
            current_average: calculate_monthly(&self, config),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_zero() {
        let metrics = DriverMetrics::default();
        assert_eq!(metrics, DriverMetrics::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_completed_job_caps_work_rate() {
        let mut metrics = DriverMetrics::new(30.0, 0.0, 0.0, 0.0);
        metrics.record_completed_job(31.0);
        assert_eq!(metrics.work_rate, 31.0);
        metrics.record_completed_job(31.0);
        assert_eq!(metrics.work_rate, 31.0);
    }

    #[test]
    fn test_feedback_moves_rate_both_ways() {
        let mut metrics = DriverMetrics::default();
        metrics.record_feedback(Feedback::Positive);
        metrics.record_feedback(Feedback::Positive);
        metrics.record_feedback(Feedback::Negative);
        assert_eq!(metrics.feedback_rate, 1.0);
    }

    #[test]
    fn test_feedback_try_from() {
        assert_eq!(Feedback::try_from(1), Ok(Feedback::Positive));
        assert_eq!(Feedback::try_from(-1), Ok(Feedback::Negative));
        assert_eq!(Feedback::try_from(0), Err(ScoringError::InvalidFeedback(0)));
        assert_eq!(Feedback::try_from(5), Err(ScoringError::InvalidFeedback(5)));
    }

    #[test]
    fn test_cancellation_increments() {
        let mut metrics = DriverMetrics::new(10.0, 2.0, 1.0, 5.0);
        metrics.record_cancellation();
        assert_eq!(metrics.cancellation_rate, 2.0);
        // Other fields untouched
        assert_eq!(metrics.work_rate, 10.0);
        assert_eq!(metrics.current_average, 5.0);
    }

    #[test]
    fn test_with_work_days_is_uncapped() {
        let metrics = DriverMetrics::default().with_work_days(40);
        assert_eq!(metrics.work_rate, 40.0);
    }

    #[test]
    fn test_rescore_updates_average_only() {
        let metrics = DriverMetrics::new(20.0, 5.0, -3.0, 4.0);
        let rescored = metrics.rescore(&ScoringConfig::default());
        assert_eq!(rescored.current_average, 33.0);
        assert_eq!(rescored.work_rate, 20.0);
        assert_eq!(rescored.feedback_rate, 5.0);
        assert_eq!(rescored.cancellation_rate, -3.0);
    }

    #[test]
    fn test_deserialize_wire_names_and_defaults() {
        let json = r#"{"workRate": 12, "averageRate": 3.5}"#;
        let metrics: DriverMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.work_rate, 12.0);
        assert_eq!(metrics.feedback_rate, 0.0);
        assert_eq!(metrics.cancellation_rate, 0.0);
        assert_eq!(metrics.current_average, 3.5);
    }
}
