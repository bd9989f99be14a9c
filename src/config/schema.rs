use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    /// Rows shown by `roster` when `--top` is not given
    #[serde(default)]
    pub leaderboard_size: Option<usize>,
    /// Look-back window for `work-days`, e.g. "30d"
    #[serde(default)]
    pub work_day_window: Option<String>,
}

impl Config {
    /// The config written by `init-config`: every field spelled out.
    pub fn with_defaults() -> Self {
        Self {
            scoring: Some(ScoringConfig::default()),
            leaderboard_size: Some(crate::roster::DEFAULT_LEADERBOARD_SIZE),
            work_day_window: Some(crate::activity::DEFAULT_WINDOW.to_string()),
        }
    }
}
