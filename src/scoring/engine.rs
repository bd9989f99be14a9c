use super::config::ScoringConfig;
use super::error::ScoringError;
use super::factors::{monthly_contribution, Factor};
use super::normalize::rank_to_score;
use super::validation::RankContext;
use crate::metrics::DriverMetrics;

#[derive(Debug, Clone)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Work rate", "Cancellations"
    pub description: String, // e.g. "1.5 x 20", "-2 x |-3|"
    pub before: f64,         // Score before this factor
    pub after: f64,          // Score after this factor
}

#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    /// The carried-over average the factors are added to
    pub base_score: f64,
    pub factors: Vec<FactorContribution>,
    /// Unrounded monthly score, computed even when the result is rank-based
    pub monthly_score: f64,
}

#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub score: f64,
    /// True when the score came from the rank spread rather than the metrics
    pub normalized: bool,
    pub breakdown: ScoreBreakdown,
}

/// How a single driver's score is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreMode {
    /// Updated average from this period's metrics
    #[default]
    Monthly,
    /// Biannual normalization: the driver's externally supplied rank decides the score
    Biannual {
        total_drivers: Option<i64>,
        driver_rank: Option<i64>,
    },
}

/// Round half-to-even on the value scaled by `10^precision`.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round_ties_even() / scale
}

/// Rounded monthly score: current average plus the weighted contribution.
pub fn calculate_monthly(metrics: &DriverMetrics, config: &ScoringConfig) -> f64 {
    round_to(
        metrics.current_average + monthly_contribution(metrics, config),
        config.precision(),
    )
}

/// Score one driver.
///
/// In biannual mode the result depends only on `driver_rank` and
/// `total_drivers`: `(rank - 1) * total / (total - 1)`. The metrics are still
/// scored and reported in the breakdown. A pool of one driver has no spread,
/// so the monthly score is returned instead.
pub fn calculate_score(
    metrics: &DriverMetrics,
    mode: ScoreMode,
    config: &ScoringConfig,
) -> Result<ScoreResult, ScoringError> {
    let rank = match mode {
        ScoreMode::Monthly => None,
        ScoreMode::Biannual {
            total_drivers,
            driver_rank,
        } => Some(RankContext::from_parts(total_drivers, driver_rank)?),
    };

    let breakdown = score_breakdown(metrics, config);

    let result = match rank {
        Some(ctx) if ctx.total_drivers() > 1 => {
            let spread = rank_to_score(ctx.driver_rank(), ctx.total_drivers());
            tracing::debug!(
                driver_rank = ctx.driver_rank(),
                total_drivers = ctx.total_drivers(),
                spread,
                "biannual rank mapped"
            );
            ScoreResult {
                score: round_to(spread, config.precision()),
                normalized: true,
                breakdown,
            }
        }
        _ => ScoreResult {
            score: round_to(breakdown.monthly_score, config.precision()),
            normalized: false,
            breakdown,
        },
    };

    Ok(result)
}

/// Monthly scores for many drivers, one per entry and in the same order.
///
/// Always metric-based; normalization is a separate pass.
pub fn calculate_batch(entries: &[DriverMetrics], config: &ScoringConfig) -> Vec<f64> {
    entries
        .iter()
        .map(|metrics| calculate_monthly(metrics, config))
        .collect()
}

fn score_breakdown(metrics: &DriverMetrics, config: &ScoringConfig) -> ScoreBreakdown {
    let base_score = metrics.current_average;
    let mut score = base_score;
    let mut factors = Vec::with_capacity(Factor::ALL.len());

    for factor in Factor::ALL {
        let before = score;
        score += factor.contribution(metrics, config);

        let description = match factor {
            Factor::Cancellation => format!(
                "-{} x |{}|",
                factor.weight(config),
                metrics.cancellation_rate
            ),
            _ => format!("{} x {}", factor.weight(config), factor.input(metrics)),
        };

        factors.push(FactorContribution {
            label: factor.label().to_string(),
            description,
            before,
            after: score,
        });
    }

    ScoreBreakdown {
        base_score,
        factors,
        monthly_score: base_score + monthly_contribution(metrics, config),
    }
}
