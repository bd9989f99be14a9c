use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DriverId = u64;

/// Default look-back window for counting work days.
pub const DEFAULT_WINDOW: &str = "30d";

/// A job a driver held, as recorded in their availability calendar.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpan {
    pub driver_id: DriverId,
    pub start_date: DateTime<Utc>,
    /// Open-ended spans count as a single day
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl JobSpan {
    /// Calendar days covered by the span, counting both ends.
    pub fn work_days(&self) -> u32 {
        let start = self.start_date.date_naive();
        let end = self.end_date.unwrap_or(self.start_date).date_naive();
        let days = (end - start).num_days();
        if days < 0 {
            tracing::warn!(
                driver_id = self.driver_id,
                start = %self.start_date,
                "job span ends before it starts; ignoring"
            );
            return 0;
        }
        (days + 1) as u32
    }
}

/// A single ranking-relevant event reported for a driver.
///
/// Wire form: `{"event": "jobCompleted" | "feedback" | "cancellation",
/// "driverId": .., "value": ..}` where `value` is only read for feedback.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ActivityEvent {
    #[serde(rename_all = "camelCase")]
    JobCompleted { driver_id: DriverId },
    #[serde(rename_all = "camelCase")]
    Feedback { driver_id: DriverId, value: i64 },
    #[serde(rename_all = "camelCase")]
    Cancellation { driver_id: DriverId },
}

impl ActivityEvent {
    pub fn driver_id(&self) -> DriverId {
        match self {
            ActivityEvent::JobCompleted { driver_id }
            | ActivityEvent::Feedback { driver_id, .. }
            | ActivityEvent::Cancellation { driver_id } => *driver_id,
        }
    }
}

/// Parse a window like `30d` or `2weeks` into the instant it starts at.
pub fn window_start(now: DateTime<Utc>, window: &str) -> Result<DateTime<Utc>> {
    let std_window = humantime::parse_duration(window.trim())
        .with_context(|| format!("Invalid window '{}'", window))?;
    let window = Duration::from_std(std_window)
        .with_context(|| format!("Window '{}' is too large", window))?;
    Ok(now - window)
}

/// Sum the work days of every span starting on or after `since`, per driver.
pub fn count_work_days(spans: &[JobSpan], since: DateTime<Utc>) -> BTreeMap<DriverId, u32> {
    let mut totals = BTreeMap::new();
    for span in spans.iter().filter(|s| s.start_date >= since) {
        let days = span.work_days();
        tracing::debug!(driver_id = span.driver_id, days, "counted job span");
        *totals.entry(span.driver_id).or_insert(0) += days;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn span(driver_id: DriverId, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> JobSpan {
        JobSpan {
            driver_id,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_work_days_inclusive() {
        let s = span(1, at(2024, 3, 1, 22), Some(at(2024, 3, 3, 2)));
        assert_eq!(s.work_days(), 3);
    }

    #[test]
    fn test_work_days_same_day() {
        let s = span(1, at(2024, 3, 1, 8), Some(at(2024, 3, 1, 17)));
        assert_eq!(s.work_days(), 1);
    }

    #[test]
    fn test_work_days_open_ended() {
        let s = span(1, at(2024, 3, 1, 8), None);
        assert_eq!(s.work_days(), 1);
    }

    #[test]
    fn test_work_days_inverted_span() {
        let s = span(1, at(2024, 3, 5, 8), Some(at(2024, 3, 1, 8)));
        assert_eq!(s.work_days(), 0);
    }

    #[test]
    fn test_count_accumulates_per_driver() {
        let since = at(2024, 3, 1, 0);
        let spans = vec![
            span(7, at(2024, 3, 2, 9), Some(at(2024, 3, 4, 9))),
            span(7, at(2024, 3, 10, 9), None),
            span(3, at(2024, 3, 5, 9), Some(at(2024, 3, 6, 9))),
            // Before the window
            span(3, at(2024, 2, 20, 9), Some(at(2024, 3, 2, 9))),
        ];
        let totals = count_work_days(&spans, since);
        assert_eq!(totals.get(&7), Some(&4));
        assert_eq!(totals.get(&3), Some(&2));
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_window_start() {
        let now = at(2024, 3, 31, 12);
        assert_eq!(window_start(now, "30d").unwrap(), at(2024, 3, 1, 12));
        assert_eq!(window_start(now, "1week").unwrap(), at(2024, 3, 24, 12));
    }

    #[test]
    fn test_window_start_invalid() {
        assert!(window_start(Utc::now(), "soon").is_err());
    }

    #[test]
    fn test_activity_event_wire_format() {
        let json = r#"[
            {"event": "jobCompleted", "driverId": 1},
            {"event": "feedback", "driverId": 2, "value": -1},
            {"event": "cancellation", "driverId": 3}
        ]"#;
        let events: Vec<ActivityEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events[0], ActivityEvent::JobCompleted { driver_id: 1 });
        assert_eq!(
            events[1],
            ActivityEvent::Feedback {
                driver_id: 2,
                value: -1
            }
        );
        assert_eq!(events[2].driver_id(), 3);
    }

    #[test]
    fn test_activity_event_unknown_kind() {
        let json = r#"{"event": "promoted", "driverId": 1}"#;
        assert!(serde_json::from_str::<ActivityEvent>(json).is_err());
    }

    #[test]
    fn test_job_span_wire_format() {
        let json = r#"{"driverId": 4, "startDate": "2024-03-01T08:00:00Z"}"#;
        let s: JobSpan = serde_json::from_str(json).unwrap();
        assert_eq!(s.driver_id, 4);
        assert_eq!(s.end_date, None);
    }
}
