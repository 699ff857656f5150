use crate::allow_list::RuntimeAllowList;
use crate::contract::{HookInvocation, HookVerdict};

pub const SKIPPED_MESSAGE: &str = "Not a Lambda function resource, skipping validation";
pub const RUNTIME_REQUIRED_MESSAGE: &str = "Runtime is required for Lambda functions";
pub const COMPLIANT_MESSAGE: &str = "Runtime version compliance check passed";
pub const INTERNAL_FAILURE_PREFIX: &str = "Error during validation: ";

/// What the handler has to do for a decoded invocation before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetDecision {
    Skip,
    MissingRuntime,
    Check(String),
}

pub fn classify_target(invocation: &HookInvocation) -> TargetDecision {
    if !invocation.targets_lambda_function() {
        return TargetDecision::Skip;
    }

    match invocation.runtime() {
        Some(runtime) => TargetDecision::Check(runtime),
        None => TargetDecision::MissingRuntime,
    }
}

pub fn skipped_verdict(client_request_token: &str) -> HookVerdict {
    HookVerdict::success(client_request_token, SKIPPED_MESSAGE)
}

pub fn missing_runtime_verdict(client_request_token: &str) -> HookVerdict {
    HookVerdict::non_compliant(client_request_token, RUNTIME_REQUIRED_MESSAGE)
}

pub fn evaluate_runtime(
    client_request_token: &str,
    runtime: &str,
    allow_list: &RuntimeAllowList,
) -> HookVerdict {
    if allow_list.permits(runtime) {
        HookVerdict::success(client_request_token, COMPLIANT_MESSAGE)
    } else {
        HookVerdict::non_compliant(
            client_request_token,
            format!(
                "Runtime {runtime} is not compliant. Please use one of: {}",
                allow_list.joined()
            ),
        )
    }
}

pub fn internal_failure(client_request_token: &str, error: impl std::fmt::Display) -> HookVerdict {
    HookVerdict::internal_failure(
        client_request_token,
        format!("{INTERNAL_FAILURE_PREFIX}{error}"),
    )
}
