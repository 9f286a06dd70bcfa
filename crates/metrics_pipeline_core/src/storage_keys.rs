pub const RAW_PREFIX: &str = "raw";
pub const RAW_SUFFIX: &str = ".json";

pub fn raw_object_key(timestamp: i64) -> String {
    format!("{RAW_PREFIX}/{timestamp}{RAW_SUFFIX}")
}

/// Raw object key for a summary record, which shares the payload timestamp.
pub fn raw_object_key_for_run(run_id: &str) -> String {
    format!("{RAW_PREFIX}/{run_id}{RAW_SUFFIX}")
}
