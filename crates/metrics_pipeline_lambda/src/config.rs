use crate::error::ConfigError;

pub const BUCKET_NAME_VAR: &str = "BUCKET_NAME";
pub const TABLE_NAME_VAR: &str = "TABLE_NAME";
pub const STACK_NAME_VAR: &str = "AWS_SAM_STACK_NAME";
/// Stack output that carries the deployed function name.
pub const FUNCTION_OUTPUT_KEY: &str = "PipelineFunction";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub bucket: String,
    pub table: String,
    pub stack_name: Option<String>,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Ok(Self {
            bucket: read(BUCKET_NAME_VAR).ok_or(ConfigError::MissingVariable(BUCKET_NAME_VAR))?,
            table: read(TABLE_NAME_VAR).ok_or(ConfigError::MissingVariable(TABLE_NAME_VAR))?,
            stack_name: read(STACK_NAME_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn reads_all_variables() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            ("BUCKET_NAME", "raw-bucket"),
            ("TABLE_NAME", "summaries"),
            ("AWS_SAM_STACK_NAME", "metrics-stack"),
        ]))
        .expect("config should load");

        assert_eq!(
            config,
            PipelineConfig {
                bucket: "raw-bucket".to_string(),
                table: "summaries".to_string(),
                stack_name: Some("metrics-stack".to_string()),
            }
        );
    }

    #[test]
    fn stack_name_is_optional() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            ("BUCKET_NAME", "raw-bucket"),
            ("TABLE_NAME", "summaries"),
            ("AWS_SAM_STACK_NAME", "  "),
        ]))
        .expect("config should load");

        assert_eq!(config.stack_name, None);
    }

    #[test]
    fn missing_bucket_or_table_is_an_error() {
        let error = PipelineConfig::from_lookup(lookup_from(&[("TABLE_NAME", "summaries")]))
            .expect_err("bucket is required");
        assert_eq!(error, ConfigError::MissingVariable("BUCKET_NAME"));
        assert_eq!(error.to_string(), "BUCKET_NAME must be configured");

        let error = PipelineConfig::from_lookup(lookup_from(&[("BUCKET_NAME", "raw-bucket")]))
            .expect_err("table is required");
        assert_eq!(error, ConfigError::MissingVariable("TABLE_NAME"));
    }
}
