use runtime_hook_core::contract::{salvage_correlation_token, HookInvocation, HookVerdict};
use runtime_hook_core::evaluation::{
    classify_target, evaluate_runtime, internal_failure, missing_runtime_verdict,
    skipped_verdict, TargetDecision,
};
use serde_json::{json, Value};

use crate::adapters::parameter_store::{AllowListClient, ParameterStore};
use crate::logging::{log_error, log_info};

pub const MISSING_PARAMETER_NAME_MESSAGE: &str = "Permitted Runtimes Parameter is not set";

const COMPONENT: &str = "runtime_compliance_hook";

/// Evaluates one hook invocation. Every outcome, including configuration and
/// parameter-store failures, is reported as a verdict rather than an error.
pub fn handle_hook_event(
    event: Value,
    parameter_name: Option<&str>,
    store: &dyn ParameterStore,
) -> HookVerdict {
    log_info(COMPONENT, "hook_invoked", json!({ "event": &event }));

    let fallback_token = salvage_correlation_token(&event);
    let verdict = match parameter_name {
        Some(name) if !name.trim().is_empty() => validate(event, name, store),
        _ => Err(MISSING_PARAMETER_NAME_MESSAGE.to_string()),
    };

    verdict.unwrap_or_else(|error| {
        log_error(
            COMPONENT,
            "validation_failed",
            json!({
                "client_request_token": fallback_token.clone(),
                "error": error.clone(),
            }),
        );
        internal_failure(&fallback_token, error)
    })
}

fn validate(
    event: Value,
    parameter_name: &str,
    store: &dyn ParameterStore,
) -> Result<HookVerdict, String> {
    let invocation = HookInvocation::from_event(event).map_err(|error| error.to_string())?;
    let token = invocation.correlation_token();
    let target_type = invocation.target_type();

    let runtime = match classify_target(&invocation) {
        TargetDecision::Skip => {
            log_info(
                COMPONENT,
                "target_skipped",
                json!({ "client_request_token": token, "target_type": target_type }),
            );
            return Ok(skipped_verdict(token));
        }
        TargetDecision::MissingRuntime => {
            log_error(
                COMPONENT,
                "runtime_missing",
                json!({ "client_request_token": token, "target_type": target_type }),
            );
            return Ok(missing_runtime_verdict(token));
        }
        TargetDecision::Check(runtime) => runtime,
    };

    let allow_list = AllowListClient::new(store).fetch(parameter_name)?;
    let verdict = evaluate_runtime(token, &runtime, &allow_list);

    let details = json!({
        "client_request_token": token,
        "runtime": runtime,
        "permitted_runtimes": allow_list.runtimes(),
    });
    if verdict.is_success() {
        log_info(COMPONENT, "runtime_compliant", details);
    } else {
        log_error(COMPONENT, "runtime_non_compliant", details);
    }

    Ok(verdict)
}
