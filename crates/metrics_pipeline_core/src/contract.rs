use serde::{Deserialize, Serialize};
use serde_json::Value;

use rust_decimal::Decimal;

use crate::coercion::{exact_decimal, StorageItem, StorageValue};

pub const STATUS_OK: &str = "ok";
pub const STATUS_ERROR: &str = "error";
pub const RUN_COMPLETE_MESSAGE: &str = "run complete";
pub const RUN_ACTION: &str = "run";
pub const RAW_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    pub clicks: i64,
    pub impressions: i64,
    pub ctr: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricsPayload {
    pub timestamp: i64,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryRecord {
    pub run_id: String,
    pub clicks: i64,
    pub impressions: i64,
    pub ctr: Decimal,
}

impl SummaryRecord {
    pub fn from_payload(payload: &MetricsPayload) -> Self {
        Self {
            run_id: payload.timestamp.to_string(),
            clicks: payload.metrics.clicks,
            impressions: payload.metrics.impressions,
            ctr: exact_decimal(payload.metrics.ctr),
        }
    }

    pub fn to_item(&self) -> StorageItem {
        StorageItem::from([
            ("run_id".to_string(), StorageValue::String(self.run_id.clone())),
            ("clicks".to_string(), StorageValue::Integer(self.clicks)),
            (
                "impressions".to_string(),
                StorageValue::Integer(self.impressions),
            ),
            ("ctr".to_string(), StorageValue::Decimal(self.ctr)),
        ])
    }
}

/// Output of the standalone scraper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapePayload {
    pub ts: i64,
    pub values: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineRequest {
    Run,
    LatestStatus,
}

impl PipelineRequest {
    /// Parses an invocation event. Only `queryStringParameters.action == "run"`
    /// selects a run; every other well-formed shape is a status query.
    pub fn from_event(event: &Value) -> Result<Self, RequestError> {
        let Some(object) = event.as_object() else {
            return Err(RequestError::new("Request payload must be a JSON object"));
        };

        let parameters = match object.get("queryStringParameters") {
            None | Some(Value::Null) => return Ok(Self::LatestStatus),
            Some(Value::Object(parameters)) => parameters,
            Some(_) => {
                return Err(RequestError::new(
                    "queryStringParameters must be a JSON object",
                ))
            }
        };

        match parameters.get("action").and_then(Value::as_str) {
            Some(RUN_ACTION) => Ok(Self::Run),
            _ => Ok(Self::LatestStatus),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    message: String,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RequestError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunCompleteBody {
    pub status: String,
    pub message: String,
    pub s3_key: String,
}

impl RunCompleteBody {
    pub fn new(s3_key: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            message: RUN_COMPLETE_MESSAGE.to_string(),
            s3_key: s3_key.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatestStatusBody {
    pub status: String,
    pub latest: Value,
}

impl LatestStatusBody {
    pub fn new(latest: Value) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            latest,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
        }
    }
}
