//! AWS SDK implementations of the adapter traits.
//!
//! The traits are synchronous; each call bridges onto the async SDK with
//! `block_in_place`, so callers must run on the multi-thread tokio runtime.

use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use metrics_pipeline_core::coercion::{StorageItem, StorageValue};
use rust_decimal::Decimal;

use crate::adapters::object_store::RawObjectStore;
use crate::adapters::stack_outputs::{StackOutput, StackOutputs};
use crate::adapters::summary_table::SummaryTable;
use crate::error::{MetadataLookupError, StoreError};

/// SDK clients built once per process and shared across invocations.
#[derive(Clone)]
pub struct AwsClients {
    pub s3: aws_sdk_s3::Client,
    pub dynamodb: aws_sdk_dynamodb::Client,
    pub cloudformation: aws_sdk_cloudformation::Client,
}

impl AwsClients {
    pub async fn load() -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            s3: aws_sdk_s3::Client::new(&aws_config),
            dynamodb: aws_sdk_dynamodb::Client::new(&aws_config),
            cloudformation: aws_sdk_cloudformation::Client::new(&aws_config),
        }
    }
}

fn block_on_sdk<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub struct S3RawObjectStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3RawObjectStore {
    pub fn new(s3_client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }
}

impl RawObjectStore for S3RawObjectStore {
    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let content_type = content_type.to_string();
        let body_bytes = body.to_vec();
        let client = self.s3_client.clone();

        block_on_sdk(async move {
            client
                .put_object()
                .bucket(bucket)
                .key(&object_key)
                .content_type(content_type)
                .body(ByteStream::from(body_bytes))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| StoreError::ObjectStore {
                    key: object_key,
                    message: DisplayErrorContext(&error).to_string(),
                })
        })
    }
}

pub struct DynamoDbSummaryTable {
    table_name: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl DynamoDbSummaryTable {
    pub fn new(dynamodb_client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            dynamodb_client,
        }
    }
}

impl SummaryTable for DynamoDbSummaryTable {
    fn put_item(&self, item: &StorageItem) -> Result<(), StoreError> {
        let table_name = self.table_name.clone();
        let attributes = to_attributes(item);
        let client = self.dynamodb_client.clone();

        block_on_sdk(async move {
            client
                .put_item()
                .table_name(table_name)
                .set_item(Some(attributes))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| StoreError::Table {
                    operation: "put_item",
                    message: DisplayErrorContext(&error).to_string(),
                })
        })
    }

    fn scan_one(&self) -> Result<Option<StorageItem>, StoreError> {
        let table_name = self.table_name.clone();
        let client = self.dynamodb_client.clone();

        let output = block_on_sdk(async move {
            client
                .scan()
                .table_name(table_name)
                .limit(1)
                .send()
                .await
                .map_err(|error| StoreError::Table {
                    operation: "scan",
                    message: DisplayErrorContext(&error).to_string(),
                })
        })?;

        Ok(output.items().first().map(from_attributes))
    }
}

pub struct CloudFormationStackOutputs {
    cloudformation_client: aws_sdk_cloudformation::Client,
}

impl CloudFormationStackOutputs {
    pub fn new(cloudformation_client: aws_sdk_cloudformation::Client) -> Self {
        Self {
            cloudformation_client,
        }
    }
}

impl StackOutputs for CloudFormationStackOutputs {
    fn describe_outputs(&self, stack_name: &str) -> Result<Vec<StackOutput>, MetadataLookupError> {
        let name = stack_name.to_string();
        let client = self.cloudformation_client.clone();

        block_on_sdk(async move {
            let output = client
                .describe_stacks()
                .stack_name(&name)
                .send()
                .await
                .map_err(|error| MetadataLookupError {
                    stack_name: name.clone(),
                    message: DisplayErrorContext(&error).to_string(),
                })?;

            let Some(stack) = output.stacks().first() else {
                return Err(MetadataLookupError {
                    stack_name: name,
                    message: "no stack returned".to_string(),
                });
            };

            Ok(stack
                .outputs()
                .iter()
                .filter_map(|output| {
                    Some(StackOutput {
                        key: output.output_key()?.to_string(),
                        value: output.output_value()?.to_string(),
                    })
                })
                .collect())
        })
    }
}

pub fn to_attributes(item: &StorageItem) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(key, value)| (key.clone(), to_attribute_value(value)))
        .collect()
}

pub fn to_attribute_value(value: &StorageValue) -> AttributeValue {
    match value {
        StorageValue::Null => AttributeValue::Null(true),
        StorageValue::Bool(flag) => AttributeValue::Bool(*flag),
        StorageValue::Integer(integer) => AttributeValue::N(integer.to_string()),
        StorageValue::Decimal(decimal) => AttributeValue::N(decimal.to_string()),
        StorageValue::String(text) => AttributeValue::S(text.clone()),
        StorageValue::List(values) => {
            AttributeValue::L(values.iter().map(to_attribute_value).collect())
        }
        StorageValue::Map(entries) => AttributeValue::M(to_attributes(entries)),
    }
}

pub fn from_attributes(attributes: &HashMap<String, AttributeValue>) -> StorageItem {
    attributes
        .iter()
        .map(|(key, value)| (key.clone(), from_attribute_value(value)))
        .collect()
}

/// Binary attributes have no storage counterpart and fall back to lossy text.
pub fn from_attribute_value(value: &AttributeValue) -> StorageValue {
    match value {
        AttributeValue::S(text) => StorageValue::String(text.clone()),
        AttributeValue::N(number) => parse_number(number),
        AttributeValue::Bool(flag) => StorageValue::Bool(*flag),
        AttributeValue::Null(_) => StorageValue::Null,
        AttributeValue::L(values) => {
            StorageValue::List(values.iter().map(from_attribute_value).collect())
        }
        AttributeValue::M(entries) => StorageValue::Map(from_attributes(entries)),
        AttributeValue::Ss(values) => StorageValue::List(
            values
                .iter()
                .map(|text| StorageValue::String(text.clone()))
                .collect(),
        ),
        AttributeValue::Ns(values) => {
            StorageValue::List(values.iter().map(|number| parse_number(number)).collect())
        }
        AttributeValue::B(blob) => {
            StorageValue::String(String::from_utf8_lossy(blob.as_ref()).into_owned())
        }
        AttributeValue::Bs(blobs) => StorageValue::List(
            blobs
                .iter()
                .map(|blob| StorageValue::String(String::from_utf8_lossy(blob.as_ref()).into_owned()))
                .collect(),
        ),
        _ => StorageValue::Null,
    }
}

/// `N` attributes always come back as decimals, whether or not they are integral.
fn parse_number(text: &str) -> StorageValue {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map(StorageValue::Decimal)
        .unwrap_or_else(|_| StorageValue::String(text.to_string()))
}
