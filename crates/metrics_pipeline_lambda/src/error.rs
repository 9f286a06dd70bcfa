use metrics_pipeline_core::contract::RequestError;
use thiserror::Error;

/// Failures from the object store or the summary table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write object {key}: {message}")]
    ObjectStore { key: String, message: String },

    #[error("summary table {operation} failed: {message}")]
    Table {
        operation: &'static str,
        message: String,
    },

    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("stack output lookup failed for {stack_name}: {message}")]
pub struct MetadataLookupError {
    pub stack_name: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] RequestError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    MissingVariable(&'static str),
}
