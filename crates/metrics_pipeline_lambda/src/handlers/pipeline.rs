use metrics_pipeline_core::coercion::{item_as_read_back, item_to_json};
use metrics_pipeline_core::contract::{
    LatestStatusBody, MetricsPayload, PipelineRequest, RunCompleteBody, SummaryRecord,
    RAW_CONTENT_TYPE, STATUS_ERROR,
};
use metrics_pipeline_core::storage_keys::raw_object_key;
use metrics_pipeline_core::synthetic::PayloadSource;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::adapters::object_store::RawObjectStore;
use crate::adapters::summary_table::SummaryTable;
use crate::error::{PipelineError, StoreError};

const COMPONENT: &str = "pipeline_handler";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Everything one invocation touches. Built once per process and borrowed
/// per request.
#[derive(Clone, Copy)]
pub struct PipelineDependencies<'a> {
    pub raw_store: &'a dyn RawObjectStore,
    pub summary_table: &'a dyn SummaryTable,
    pub payload_source: &'a dyn PayloadSource,
}

/// Entry point for one invocation. Every failure is converted to a 500
/// envelope here and nowhere else.
pub fn handle_pipeline_event(event: Value, deps: &PipelineDependencies<'_>) -> ApiGatewayResponse {
    match dispatch(&event, deps) {
        Ok(response) => response,
        Err(failure) => {
            error!(
                component = COMPONENT,
                event = "request_failed",
                error = %failure,
                "pipeline request failed"
            );
            error_response(500, &failure.to_string())
        }
    }
}

fn dispatch(
    event: &Value,
    deps: &PipelineDependencies<'_>,
) -> Result<ApiGatewayResponse, PipelineError> {
    match PipelineRequest::from_event(event)? {
        PipelineRequest::Run => {
            let s3_key = run_pipeline(deps)?;
            success_response(200, RunCompleteBody::new(s3_key))
        }
        PipelineRequest::LatestStatus => {
            let latest = read_latest_summary(deps.summary_table)?;
            info!(
                component = COMPONENT,
                event = "latest_status_read",
                empty = latest.as_object().is_some_and(|entries| entries.is_empty()),
            );
            success_response(200, LatestStatusBody::new(latest))
        }
    }
}

/// Generate, write raw, write summary. The two writes are independent; a
/// failed summary write leaves the raw object in place.
pub fn run_pipeline(deps: &PipelineDependencies<'_>) -> Result<String, StoreError> {
    let payload = deps.payload_source.next_payload();
    info!(
        component = COMPONENT,
        event = "run_started",
        timestamp = payload.timestamp,
    );

    let s3_key = write_raw_payload(deps.raw_store, &payload)?;
    info!(
        component = COMPONENT,
        event = "raw_payload_written",
        s3_key = %s3_key,
    );

    let record = write_summary(deps.summary_table, &payload)?;
    info!(
        component = COMPONENT,
        event = "run_completed",
        run_id = %record.run_id,
        clicks = record.clicks,
        impressions = record.impressions,
        ctr = %record.ctr,
        s3_key = %s3_key,
    );

    Ok(s3_key)
}

pub fn write_raw_payload(
    store: &dyn RawObjectStore,
    payload: &MetricsPayload,
) -> Result<String, StoreError> {
    let key = raw_object_key(payload.timestamp);
    let body = serde_json::to_vec(payload)?;
    store.put_object(&key, &body, RAW_CONTENT_TYPE)?;
    Ok(key)
}

pub fn write_summary(
    table: &dyn SummaryTable,
    payload: &MetricsPayload,
) -> Result<SummaryRecord, StoreError> {
    let record = SummaryRecord::from_payload(payload);
    table.put_item(&record.to_item())?;
    Ok(record)
}

/// One record from an unordered scan, or `{}` for an empty table. The record
/// is not guaranteed to be the most recent one. Numbers render as decimal
/// strings, integral ones included.
pub fn read_latest_summary(table: &dyn SummaryTable) -> Result<Value, StoreError> {
    Ok(table
        .scan_one()?
        .map(|item| item_to_json(&item_as_read_back(&item)))
        .unwrap_or_else(|| json!({})))
}

fn success_response(
    status_code: u16,
    payload: impl Serialize,
) -> Result<ApiGatewayResponse, PipelineError> {
    Ok(ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: serde_json::to_string(&payload).map_err(StoreError::Serialization)?,
    })
}

fn error_response(status_code: u16, message: &str) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: json!({
            "status": STATUS_ERROR,
            "message": message,
        })
        .to_string(),
    }
}
