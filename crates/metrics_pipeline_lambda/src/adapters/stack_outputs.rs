use crate::error::MetadataLookupError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    pub key: String,
    pub value: String,
}

pub trait StackOutputs: Send + Sync {
    fn describe_outputs(&self, stack_name: &str) -> Result<Vec<StackOutput>, MetadataLookupError>;
}
