use metrics_pipeline_core::coercion::StorageItem;

use crate::error::StoreError;

pub trait SummaryTable: Send + Sync {
    /// Upserts `item` by its primary key.
    fn put_item(&self, item: &StorageItem) -> Result<(), StoreError>;

    /// Returns at most one item from an unordered scan.
    fn scan_one(&self) -> Result<Option<StorageItem>, StoreError>;
}
