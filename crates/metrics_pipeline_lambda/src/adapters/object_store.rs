use crate::error::StoreError;

pub trait RawObjectStore: Send + Sync {
    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError>;
}
