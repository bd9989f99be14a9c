//! JSON request/response contract of the scoring engine.
//!
//! A request is either one object (single driver) or an array of objects
//! (batch). Every object carries the driver's metrics; the single form may add
//! `isBiannual`, `totalDrivers` and `driverRank`, and a batch is normalized
//! when its first entry sets `isBiannual`. A single request reads missing
//! metrics as zero, while every batch entry must carry all four.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::metrics::{DriverMetrics, METRIC_FIELDS};
use crate::scoring::{
    calculate_batch, calculate_score, normalize_rankings, ScoreMode, ScoringConfig, ScoringError,
};

/// One driver in a request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEntry {
    #[serde(flatten)]
    pub metrics: DriverMetrics,
    #[serde(default)]
    pub is_biannual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_drivers: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_rank: Option<i64>,
}

impl RequestEntry {
    pub fn mode(&self) -> ScoreMode {
        if self.is_biannual {
            ScoreMode::Biannual {
                total_drivers: self.total_drivers,
                driver_rank: self.driver_rank,
            }
        } else {
            ScoreMode::Monthly
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Single(RequestEntry),
    Batch(Vec<RequestEntry>),
}

impl Request {
    /// Decode a request body. Any malformed entry rejects the whole request.
    pub fn parse(body: &str) -> Result<Self, ScoringError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ScoringError::InvalidRequest(format!("malformed JSON: {}", e)))?;

        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    if let Some(field) = missing_metric_field(&item) {
                        return Err(ScoringError::InvalidRequest(format!(
                            "entry {}: missing field `{}`",
                            i, field
                        )));
                    }
                    serde_json::from_value(item).map_err(|e| {
                        ScoringError::InvalidRequest(format!("entry {}: {}", i, e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Request::Batch),
            Value::Object(_) => serde_json::from_value(value)
                .map(Request::Single)
                .map_err(|e| ScoringError::InvalidRequest(e.to_string())),
            other => Err(ScoringError::InvalidRequest(format!(
                "expected an object or an array, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&ScoringError> for ErrorBody {
    fn from(err: &ScoringError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Response {
    Single { score: f64 },
    Batch { scores: Vec<f64> },
    Error { error: ErrorBody },
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

impl From<&ScoringError> for Response {
    fn from(err: &ScoringError) -> Self {
        Response::Error {
            error: ErrorBody::from(err),
        }
    }
}

/// Score a decoded request.
pub fn handle_request(request: &Request, config: &ScoringConfig) -> Result<Response, ScoringError> {
    match request {
        Request::Single(entry) => {
            let result = calculate_score(&entry.metrics, entry.mode(), config)?;
            debug!(
                score = result.score,
                normalized = result.normalized,
                "scored single driver"
            );
            Ok(Response::Single {
                score: result.score,
            })
        }
        Request::Batch(entries) => {
            let metrics: Vec<DriverMetrics> = entries.iter().map(|e| e.metrics).collect();
            let mut scores = calculate_batch(&metrics, config);

            let biannual = entries.first().map(|e| e.is_biannual).unwrap_or(false);
            if biannual {
                scores = normalize_rankings(&scores, config.precision());
            }
            if entries.iter().skip(1).any(|e| e.is_biannual != biannual) {
                warn!("isBiannual differs between batch entries; only the first entry's flag is used");
            }

            debug!(drivers = scores.len(), biannual, "scored batch");
            Ok(Response::Batch { scores })
        }
    }
}

/// Parse and score a request body, folding failures into an error response.
pub fn respond(body: &str, config: &ScoringConfig) -> Response {
    match Request::parse(body).and_then(|request| handle_request(&request, config)) {
        Ok(response) => response,
        Err(err) => {
            warn!(kind = err.kind(), "request rejected: {}", err);
            Response::from(&err)
        }
    }
}

/// First metric field absent from a batch entry. Non-objects are left to serde.
fn missing_metric_field(item: &Value) -> Option<&'static str> {
    let object = item.as_object()?;
    METRIC_FIELDS
        .into_iter()
        .find(|field| !object.contains_key(*field))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
