use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::activity::{ActivityEvent, DriverId};
use crate::metrics::{DriverMetrics, Feedback};
use crate::scoring::{calculate_batch, normalize_rankings, ScoringConfig};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// A driver and their current ranking metrics.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub driver_id: DriverId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub metrics: DriverMetrics,
}

impl RosterEntry {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("driver #{}", self.driver_id))
    }
}

/// New average assigned to a driver by biannual normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub driver_id: DriverId,
    pub previous_average: f64,
    pub new_average: f64,
}

/// Counted work days folded into one driver's ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRateUpdate {
    pub driver_id: DriverId,
    pub work_days: u32,
    pub previous_average: f64,
    pub new_average: f64,
    /// The driver had no roster entry and started from zeroed metrics
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tally {
    JobCompleted,
    Feedback(Feedback),
    Cancellation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizationOutcome {
    Normalized(Vec<Assignment>),
    /// A roster of one (or none) has no spread to normalize into
    NotEnoughDrivers,
}

/// Load a roster from a JSON array of entries.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file at {}", path.display()))?;
    let roster: Vec<RosterEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse roster: invalid JSON in {}", path.display()))?;
    Ok(roster)
}

/// Write a roster back as pretty JSON, replacing the file atomically.
pub fn save_roster(path: &Path, entries: &[RosterEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).context("Failed to serialize roster")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(json.as_bytes())
        .context("Failed to write roster")?;
    file.commit().context("Failed to save roster")?;

    Ok(())
}

/// Highest current average first; ties by driver id.
fn by_average_desc(a: &RosterEntry, b: &RosterEntry) -> Ordering {
    b.metrics
        .current_average
        .total_cmp(&a.metrics.current_average)
        .then(a.driver_id.cmp(&b.driver_id))
}

/// The `limit` best drivers by current average.
pub fn leaderboard(entries: &[RosterEntry], limit: Option<usize>) -> Vec<RosterEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(by_average_desc);
    sorted.truncate(limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE));
    sorted
}

/// Replace each counted driver's work rate with their work days and rescore.
///
/// Drivers missing from the roster are appended with zeroed metrics before
/// rescoring. Updates come back in driver id order.
pub fn apply_work_days(
    roster: &mut Vec<RosterEntry>,
    work_days: &BTreeMap<DriverId, u32>,
    config: &ScoringConfig,
) -> Vec<WorkRateUpdate> {
    let mut updates = Vec::with_capacity(work_days.len());

    for (&driver_id, &days) in work_days {
        let position = roster.iter().position(|e| e.driver_id == driver_id);
        let created = position.is_none();
        let index = match position {
            Some(index) => index,
            None => {
                roster.push(RosterEntry {
                    driver_id,
                    name: None,
                    metrics: DriverMetrics::default(),
                });
                roster.len() - 1
            }
        };

        let entry = &mut roster[index];
        let previous_average = entry.metrics.current_average;
        entry.metrics = entry.metrics.with_work_days(days).rescore(config);
        tracing::debug!(driver_id, days, created, "work rate updated");

        updates.push(WorkRateUpdate {
            driver_id,
            work_days: days,
            previous_average,
            new_average: entry.metrics.current_average,
            created,
        });
    }

    tracing::info!(drivers = updates.len(), "work rates processed");
    updates
}

/// Apply job, feedback and cancellation events to the roster's tallies.
///
/// Every event is checked before any is applied: an unknown driver or a
/// feedback value other than 1 or -1 leaves the roster untouched. With
/// `rescore`, each touched driver's average is recomputed afterwards.
/// Returns the number of events applied.
pub fn apply_events(
    roster: &mut [RosterEntry],
    events: &[ActivityEvent],
    config: &ScoringConfig,
    rescore: bool,
) -> Result<usize> {
    let index: HashMap<DriverId, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, e)| (e.driver_id, i))
        .collect();

    let mut tallies = Vec::with_capacity(events.len());
    for (i, event) in events.iter().enumerate() {
        let driver_id = event.driver_id();
        let position = *index
            .get(&driver_id)
            .with_context(|| format!("event {}: driver {} is not in the roster", i, driver_id))?;
        let tally = match event {
            ActivityEvent::JobCompleted { .. } => Tally::JobCompleted,
            ActivityEvent::Feedback { value, .. } => Tally::Feedback(
                Feedback::try_from(*value).with_context(|| format!("event {}", i))?,
            ),
            ActivityEvent::Cancellation { .. } => Tally::Cancellation,
        };
        tallies.push((position, tally));
    }

    let max_work_rate = config.max_work_rate();
    for &(position, tally) in &tallies {
        let metrics = &mut roster[position].metrics;
        match tally {
            Tally::JobCompleted => metrics.record_completed_job(max_work_rate),
            Tally::Feedback(feedback) => metrics.record_feedback(feedback),
            Tally::Cancellation => metrics.record_cancellation(),
        }
    }

    if rescore {
        let mut touched: Vec<usize> = tallies.iter().map(|&(position, _)| position).collect();
        touched.sort_unstable();
        touched.dedup();
        for position in touched {
            let entry = &mut roster[position];
            entry.metrics = entry.metrics.rescore(config);
        }
    }

    tracing::info!(events = tallies.len(), rescore, "activity events applied");
    Ok(tallies.len())
}

/// Re-spread the whole roster's averages over `[0, N]`.
///
/// Drivers are ordered by current average, scored as one batch, and the batch
/// is normalized. Assignments come back in that order.
pub fn biannual_normalization(
    entries: &[RosterEntry],
    config: &ScoringConfig,
) -> NormalizationOutcome {
    if entries.len() <= 1 {
        tracing::info!(drivers = entries.len(), "not enough drivers for normalization");
        return NormalizationOutcome::NotEnoughDrivers;
    }

    let mut ordered = entries.to_vec();
    ordered.sort_by(by_average_desc);

    let metrics: Vec<DriverMetrics> = ordered.iter().map(|e| e.metrics).collect();
    let scores = normalize_rankings(&calculate_batch(&metrics, config), config.precision());

    let assignments: Vec<Assignment> = ordered
        .iter()
        .zip(scores)
        .map(|(entry, new_average)| Assignment {
            driver_id: entry.driver_id,
            previous_average: entry.metrics.current_average,
            new_average,
        })
        .collect();

    tracing::info!(drivers = assignments.len(), "biannual normalization completed");
    NormalizationOutcome::Normalized(assignments)
}
