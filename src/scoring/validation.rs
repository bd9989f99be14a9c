use super::config::ScoringConfig;
use super::error::ScoringError;

/// Highest rounding precision accepted in config.
pub const MAX_PRECISION: u32 = 10;

/// Position of one driver inside the pool being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankContext {
    total_drivers: usize,
    driver_rank: usize,
}

impl RankContext {
    /// Build a rank context, rejecting ranks outside `1..=total_drivers`.
    pub fn new(total_drivers: i64, driver_rank: i64) -> Result<Self, ScoringError> {
        if total_drivers < 1 || driver_rank < 1 || driver_rank > total_drivers {
            return Err(ScoringError::InvalidRank {
                total_drivers,
                driver_rank,
            });
        }
        Ok(Self {
            total_drivers: total_drivers as usize,
            driver_rank: driver_rank as usize,
        })
    }

    /// Build a rank context from optional request fields. Both are required.
    pub fn from_parts(
        total_drivers: Option<i64>,
        driver_rank: Option<i64>,
    ) -> Result<Self, ScoringError> {
        match (total_drivers, driver_rank) {
            (Some(total), Some(rank)) => Self::new(total, rank),
            _ => Err(ScoringError::MissingParameter),
        }
    }

    pub fn total_drivers(&self) -> usize {
        self.total_drivers
    }

    pub fn driver_rank(&self) -> usize {
        self.driver_rank
    }
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let weights = [
        ("work_rate", config.work_rate),
        ("feedback", config.feedback),
        ("cancellation", config.cancellation),
        ("max_work_rate", config.max_work_rate),
    ];
    for (name, value) in weights {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(format!("scoring.{}: must be a finite number", name));
            } else if v < 0.0 {
                errors.push(format!("scoring.{}: must be non-negative", name));
            }
        }
    }

    if let Some(precision) = config.precision {
        if precision > MAX_PRECISION {
            errors.push(format!(
                "scoring.precision: {} exceeds the maximum of {}",
                precision, MAX_PRECISION
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_config() -> ScoringConfig {
        ScoringConfig {
            work_rate: None,
            feedback: None,
            cancellation: None,
            precision: None,
            max_work_rate: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_scoring(&empty_config()).is_ok());
    }

    #[test]
    fn test_negative_cancellation_weight() {
        let config = ScoringConfig {
            cancellation: Some(-2.0),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.cancellation"));
    }

    #[test]
    fn test_non_finite_weight() {
        let config = ScoringConfig {
            work_rate: Some(f64::NAN),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("finite"));
    }

    #[test]
    fn test_precision_too_large() {
        let config = ScoringConfig {
            precision: Some(12),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.precision"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            work_rate: Some(-1.0),
            feedback: Some(f64::INFINITY),
            precision: Some(99),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_rank_context_valid() {
        let ctx = RankContext::new(5, 3).unwrap();
        assert_eq!(ctx.total_drivers(), 5);
        assert_eq!(ctx.driver_rank(), 3);
        assert!(RankContext::new(1, 1).is_ok());
    }

    #[test]
    fn test_rank_context_out_of_range() {
        assert_eq!(
            RankContext::new(3, 4),
            Err(ScoringError::InvalidRank {
                total_drivers: 3,
                driver_rank: 4
            })
        );
        assert!(RankContext::new(3, 0).is_err());
        assert!(RankContext::new(0, 0).is_err());
        assert!(RankContext::new(-2, 1).is_err());
    }

    #[test]
    fn test_rank_context_requires_both_parts() {
        assert_eq!(
            RankContext::from_parts(Some(3), None),
            Err(ScoringError::MissingParameter)
        );
        assert_eq!(
            RankContext::from_parts(None, Some(1)),
            Err(ScoringError::MissingParameter)
        );
        assert_eq!(
            RankContext::from_parts(None, None),
            Err(ScoringError::MissingParameter)
        );
        assert!(RankContext::from_parts(Some(3), Some(1)).is_ok());
    }
}
