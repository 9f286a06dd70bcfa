use tracing::{info, warn};

use crate::adapters::stack_outputs::StackOutputs;

const COMPONENT: &str = "identity_resolver";

/// Looks up the deployed function name from stack outputs.
///
/// Diagnostic only: a missing stack name, a failed lookup, or a missing
/// output all yield `None` and are logged, never returned as errors.
pub fn resolve_function_name(
    outputs: &dyn StackOutputs,
    stack_name: Option<&str>,
    output_key: &str,
) -> Option<String> {
    let Some(stack_name) = stack_name.filter(|name| !name.trim().is_empty()) else {
        warn!(
            component = COMPONENT,
            event = "function_identity_unavailable",
            reason = "stack name not configured",
        );
        return None;
    };

    let stack_outputs = match outputs.describe_outputs(stack_name) {
        Ok(value) => value,
        Err(lookup_error) => {
            warn!(
                component = COMPONENT,
                event = "function_identity_unavailable",
                error = %lookup_error,
                "could not fetch function name"
            );
            return None;
        }
    };

    let function_name = stack_outputs
        .into_iter()
        .find(|output| output.key == output_key)
        .map(|output| output.value);

    match &function_name {
        Some(name) => info!(
            component = COMPONENT,
            event = "function_identity_resolved",
            stack_name,
            function_name = %name,
        ),
        None => warn!(
            component = COMPONENT,
            event = "function_identity_unavailable",
            stack_name,
            output_key,
            reason = "output not found",
        ),
    }
    function_name
}
