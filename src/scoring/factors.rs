use super::config::ScoringConfig;
use crate::metrics::DriverMetrics;

/// A weighted input of the monthly contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    WorkRate,
    Feedback,
    Cancellation,
}

impl Factor {
    pub const ALL: [Factor; 3] = [Factor::WorkRate, Factor::Feedback, Factor::Cancellation];

    pub fn label(self) -> &'static str {
        match self {
            Factor::WorkRate => "Work rate",
            Factor::Feedback => "Feedback",
            Factor::Cancellation => "Cancellations",
        }
    }

    pub fn weight(self, config: &ScoringConfig) -> f64 {
        match self {
            Factor::WorkRate => config.work_rate_weight(),
            Factor::Feedback => config.feedback_weight(),
            Factor::Cancellation => config.cancellation_weight(),
        }
    }

    /// The metric the weight is applied to. Cancellations count by magnitude.
    pub fn input(self, metrics: &DriverMetrics) -> f64 {
        match self {
            Factor::WorkRate => metrics.work_rate,
            Factor::Feedback => metrics.feedback_rate,
            Factor::Cancellation => metrics.cancellation_rate.abs(),
        }
    }

    /// Signed amount this factor adds to the monthly score.
    pub fn contribution(self, metrics: &DriverMetrics, config: &ScoringConfig) -> f64 {
        let weighted = self.weight(config) * self.input(metrics);
        match self {
            Factor::Cancellation => -weighted,
            _ => weighted,
        }
    }
}

/// Monthly contribution: `work * w_work + feedback * w_feedback - |cancellations| * w_cancel`.
pub fn monthly_contribution(metrics: &DriverMetrics, config: &ScoringConfig) -> f64 {
    let rewards = Factor::WorkRate.weight(config) * Factor::WorkRate.input(metrics)
        + Factor::Feedback.weight(config) * Factor::Feedback.input(metrics);
    rewards - Factor::Cancellation.weight(config) * Factor::Cancellation.input(metrics)
}
