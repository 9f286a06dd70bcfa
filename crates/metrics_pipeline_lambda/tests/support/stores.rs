#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use metrics_pipeline_core::coercion::{StorageItem, StorageValue};
use metrics_pipeline_core::contract::{Metrics, MetricsPayload};
use metrics_pipeline_core::synthetic::PayloadSource;
use metrics_pipeline_lambda::adapters::object_store::RawObjectStore;
use metrics_pipeline_lambda::adapters::summary_table::SummaryTable;
use metrics_pipeline_lambda::error::StoreError;

/// In-memory object store keyed by object key.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .keys()
            .cloned()
            .collect()
    }

    pub fn body(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(key)
            .cloned()
    }
}

impl RawObjectStore for MemoryObjectStore {
    fn put_object(&self, key: &str, body: &[u8], _content_type: &str) -> Result<(), StoreError> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }
}

pub struct FailingObjectStore;

impl RawObjectStore for FailingObjectStore {
    fn put_object(&self, key: &str, _body: &[u8], _content_type: &str) -> Result<(), StoreError> {
        Err(StoreError::ObjectStore {
            key: key.to_string(),
            message: "NoSuchBucket: The specified bucket does not exist".to_string(),
        })
    }
}

/// In-memory table with upsert-by-`run_id` semantics.
#[derive(Default)]
pub struct MemoryTable {
    items: Mutex<BTreeMap<String, StorageItem>>,
}

impl MemoryTable {
    pub fn items(&self) -> Vec<StorageItem> {
        self.items
            .lock()
            .expect("poisoned mutex")
            .values()
            .cloned()
            .collect()
    }
}

impl SummaryTable for MemoryTable {
    fn put_item(&self, item: &StorageItem) -> Result<(), StoreError> {
        let Some(StorageValue::String(run_id)) = item.get("run_id") else {
            return Err(StoreError::Table {
                operation: "put_item",
                message: "ValidationException: missing key run_id".to_string(),
            });
        };
        self.items
            .lock()
            .expect("poisoned mutex")
            .insert(run_id.clone(), item.clone());
        Ok(())
    }

    fn scan_one(&self) -> Result<Option<StorageItem>, StoreError> {
        Ok(self
            .items
            .lock()
            .expect("poisoned mutex")
            .values()
            .next()
            .cloned())
    }
}

/// Table whose writes always fail; scans see an empty table.
pub struct WriteFailingTable;

impl SummaryTable for WriteFailingTable {
    fn put_item(&self, _item: &StorageItem) -> Result<(), StoreError> {
        Err(StoreError::Table {
            operation: "put_item",
            message: "ProvisionedThroughputExceededException".to_string(),
        })
    }

    fn scan_one(&self) -> Result<Option<StorageItem>, StoreError> {
        Ok(None)
    }
}

pub struct FixedPayloadSource {
    pub payload: MetricsPayload,
}

impl FixedPayloadSource {
    pub fn at(timestamp: i64) -> Self {
        Self {
            payload: MetricsPayload {
                timestamp,
                metrics: Metrics {
                    clicks: 120,
                    impressions: 4000,
                    ctr: 0.0456,
                },
            },
        }
    }
}

impl PayloadSource for FixedPayloadSource {
    fn next_payload(&self) -> MetricsPayload {
        self.payload
    }
}
