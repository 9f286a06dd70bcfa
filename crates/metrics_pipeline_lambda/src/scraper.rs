use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use metrics_pipeline_core::contract::{ScrapePayload, RAW_CONTENT_TYPE};
use metrics_pipeline_core::storage_keys::raw_object_key;
use tracing::info;

use crate::adapters::object_store::RawObjectStore;
use crate::error::StoreError;

pub const DEFAULT_OUTPUT_PATH: &str = "out/local_raw.json";

const COMPONENT: &str = "scraper";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Wrote(PathBuf),
    Uploaded { bucket: String, key: String },
}

impl fmt::Display for ScrapeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wrote(path) => write!(f, "Wrote {}", path.display()),
            Self::Uploaded { bucket, key } => write!(f, "Uploaded s3://{bucket}/{key}"),
        }
    }
}

/// Uploads through the store from `open_store` when a non-blank bucket is
/// configured, otherwise writes `output` locally. The store is only opened
/// for an upload.
pub fn run_scrape<S, F>(
    bucket: Option<&str>,
    open_store: F,
    output: &Path,
    payload: &ScrapePayload,
) -> anyhow::Result<ScrapeOutcome>
where
    S: RawObjectStore,
    F: FnOnce(&str) -> S,
{
    match bucket.filter(|bucket| !bucket.trim().is_empty()) {
        Some(bucket) => {
            let store = open_store(bucket);
            write_remote(&store, bucket, payload)
                .with_context(|| format!("failed to upload payload to bucket {bucket}"))
        }
        None => write_local(payload, output),
    }
}

/// Writes pretty-printed JSON to `path`, creating parent directories.
pub fn write_local(payload: &ScrapePayload, path: &Path) -> anyhow::Result<ScrapeOutcome> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let body = serde_json::to_string_pretty(payload).context("failed to serialize payload")?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        component = COMPONENT,
        event = "payload_written",
        path = %path.display(),
        values = payload.values.len(),
    );
    Ok(ScrapeOutcome::Wrote(path.to_path_buf()))
}

pub fn write_remote(
    store: &dyn RawObjectStore,
    bucket: &str,
    payload: &ScrapePayload,
) -> Result<ScrapeOutcome, StoreError> {
    let key = raw_object_key(payload.ts);
    let body = serde_json::to_vec(payload)?;
    store.put_object(&key, &body, RAW_CONTENT_TYPE)?;

    info!(
        component = COMPONENT,
        event = "payload_uploaded",
        bucket,
        key = %key,
        values = payload.values.len(),
    );
    Ok(ScrapeOutcome::Uploaded {
        bucket: bucket.to_string(),
        key,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        writes: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl RawObjectStore for &RecordingStore {
        fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError> {
            (**self).put_object(key, body, content_type)
        }
    }

    impl RawObjectStore for RecordingStore {
        fn put_object(
            &self,
            key: &str,
            body: &[u8],
            _content_type: &str,
        ) -> Result<(), StoreError> {
            self.writes
                .lock()
                .expect("poisoned mutex")
                .insert(key.to_string(), body.to_vec());
            Ok(())
        }
    }

    fn sample_payload() -> ScrapePayload {
        ScrapePayload {
            ts: 1_700_000_000,
            values: vec![0, 17, 100],
        }
    }

    #[test]
    fn local_write_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("out").join("nested").join("local_raw.json");

        let outcome = write_local(&sample_payload(), &path).expect("write should succeed");

        assert_eq!(outcome, ScrapeOutcome::Wrote(path.clone()));
        let text = fs::read_to_string(&path).expect("file should exist");
        assert!(text.contains("\n  \"ts\": 1700000000"));
        let stored: ScrapePayload = serde_json::from_str(&text).expect("file should parse");
        assert_eq!(stored, sample_payload());
    }

    #[test]
    fn remote_write_uses_raw_key() {
        let store = RecordingStore::default();

        let outcome =
            write_remote(&store, "raw-bucket", &sample_payload()).expect("upload should succeed");

        assert_eq!(
            outcome.to_string(),
            "Uploaded s3://raw-bucket/raw/1700000000.json"
        );
        let writes = store.writes.lock().expect("poisoned mutex");
        let body = writes
            .get("raw/1700000000.json")
            .expect("object should be written");
        assert_eq!(body.as_slice(), br#"{"ts":1700000000,"values":[0,17,100]}"#);
    }

    #[test]
    fn unset_or_blank_bucket_writes_locally() {
        for bucket in [None, Some(""), Some("  ")] {
            let dir = tempfile::tempdir().expect("tempdir should be created");
            let path = dir.path().join("out").join("local_raw.json");

            let outcome = run_scrape(
                bucket,
                |_: &str| -> RecordingStore { panic!("no store should be opened for {bucket:?}") },
                &path,
                &sample_payload(),
            )
            .expect("local write should succeed");

            assert_eq!(outcome, ScrapeOutcome::Wrote(path.clone()));
            assert!(path.exists(), "missing local file for {bucket:?}");
        }
    }

    #[test]
    fn configured_bucket_uploads_through_the_store() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("local_raw.json");
        let store = RecordingStore::default();
        let mut opened_for = None;

        let outcome = run_scrape(
            Some("raw-bucket"),
            |bucket: &str| {
                opened_for = Some(bucket.to_string());
                &store
            },
            &path,
            &sample_payload(),
        )
        .expect("upload should succeed");

        assert_eq!(opened_for.as_deref(), Some("raw-bucket"));
        assert_eq!(
            outcome,
            ScrapeOutcome::Uploaded {
                bucket: "raw-bucket".to_string(),
                key: "raw/1700000000.json".to_string(),
            }
        );
        assert!(store
            .writes
            .lock()
            .expect("poisoned mutex")
            .contains_key("raw/1700000000.json"));
        assert!(!path.exists());
    }

    #[test]
    fn confirmation_names_local_path() {
        let outcome = ScrapeOutcome::Wrote(PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(outcome.to_string(), "Wrote out/local_raw.json");
    }
}
