use lambda_runtime::{service_fn, Error, LambdaEvent};
use metrics_pipeline_core::synthetic::SystemPayloadSource;
use metrics_pipeline_lambda::adapters::aws::{
    AwsClients, CloudFormationStackOutputs, DynamoDbSummaryTable, S3RawObjectStore,
};
use metrics_pipeline_lambda::config::{PipelineConfig, FUNCTION_OUTPUT_KEY};
use metrics_pipeline_lambda::handlers::identity::resolve_function_name;
use metrics_pipeline_lambda::handlers::pipeline::{
    handle_pipeline_event, ApiGatewayResponse, PipelineDependencies,
};
use metrics_pipeline_lambda::logging::init_tracing;
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: PipelineDependencies<'_>,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_pipeline_event(event.payload, &deps))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = PipelineConfig::from_env()?;
    let clients = AwsClients::load().await;

    let stack_outputs = CloudFormationStackOutputs::new(clients.cloudformation.clone());
    resolve_function_name(
        &stack_outputs,
        config.stack_name.as_deref(),
        FUNCTION_OUTPUT_KEY,
    );

    let raw_store = S3RawObjectStore::new(clients.s3.clone(), config.bucket.clone());
    let summary_table = DynamoDbSummaryTable::new(clients.dynamodb.clone(), config.table.clone());
    let payload_source = SystemPayloadSource;
    let deps = PipelineDependencies {
        raw_store: &raw_store,
        summary_table: &summary_table,
        payload_source: &payload_source,
    };

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        handle_request(event, deps)
    }))
    .await
}
