use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LAMBDA_FUNCTION_TARGET_TYPE: &str = "AWS::Lambda::Function";
pub const RUNTIME_PROPERTY: &str = "Runtime";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HookErrorCode {
    NonCompliant,
    InternalFailure,
}

/// Response returned to CloudFormation for a single hook invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HookVerdict {
    pub hook_status: HookStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HookErrorCode>,
    pub client_request_token: String,
}

impl HookVerdict {
    pub fn success(client_request_token: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hook_status: HookStatus::Success,
            message: message.into(),
            error_code: None,
            client_request_token: client_request_token.into(),
        }
    }

    pub fn non_compliant(
        client_request_token: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::failure(HookErrorCode::NonCompliant, client_request_token, message)
    }

    pub fn internal_failure(
        client_request_token: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::failure(HookErrorCode::InternalFailure, client_request_token, message)
    }

    fn failure(
        error_code: HookErrorCode,
        client_request_token: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            hook_status: HookStatus::Failure,
            message: message.into(),
            error_code: Some(error_code),
            client_request_token: client_request_token.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.hook_status == HookStatus::Success
    }
}

/// The slice of a CloudFormation hook request this handler reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HookInvocation {
    #[serde(default)]
    pub client_request_token: Option<String>,
    pub request_data: HookRequestData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HookRequestData {
    #[serde(default)]
    pub target_type: Option<String>,
    #[serde(default)]
    pub target_model: TargetModel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetModel {
    #[serde(default)]
    pub resource_properties: Option<Value>,
}

impl HookInvocation {
    pub fn from_event(event: Value) -> Result<Self, InvocationError> {
        serde_json::from_value(event)
            .map_err(|error| InvocationError::new(format!("Malformed hook request: {error}")))
    }

    pub fn correlation_token(&self) -> &str {
        self.client_request_token.as_deref().unwrap_or_default()
    }

    pub fn target_type(&self) -> Option<&str> {
        self.request_data.target_type.as_deref()
    }

    pub fn targets_lambda_function(&self) -> bool {
        self.target_type() == Some(LAMBDA_FUNCTION_TARGET_TYPE)
    }

    /// Declared `Runtime` property. Absent, `null` and empty values count as
    /// undeclared, as do properties that are not a JSON object; non-string
    /// values are returned as their JSON text.
    pub fn runtime(&self) -> Option<String> {
        let properties = self
            .request_data
            .target_model
            .resource_properties
            .as_ref()?
            .as_object()?;
        match properties.get(RUNTIME_PROPERTY)? {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Best-effort token lookup for events that failed to decode.
pub fn salvage_correlation_token(event: &Value) -> String {
    event
        .get("clientRequestToken")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationError {
    message: String,
}

impl InvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InvocationError {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lambda_event(properties: Value) -> Value {
        json!({
            "clientRequestToken": "token-1",
            "requestData": {
                "targetType": "AWS::Lambda::Function",
                "targetModel": { "resourceProperties": properties }
            }
        })
    }

    #[test]
    fn decodes_lambda_invocation() {
        let invocation = HookInvocation::from_event(lambda_event(json!({
            "Runtime": "nodejs18.x",
            "Handler": "index.handler"
        })))
        .expect("event should decode");

        assert!(invocation.targets_lambda_function());
        assert_eq!(invocation.correlation_token(), "token-1");
        assert_eq!(invocation.runtime().as_deref(), Some("nodejs18.x"));
    }

    #[test]
    fn treats_null_and_empty_runtime_as_missing() {
        for runtime in [Value::Null, json!("")] {
            let invocation = HookInvocation::from_event(lambda_event(json!({ "Runtime": runtime })))
                .expect("event should decode");
            assert_eq!(invocation.runtime(), None);
        }

        let invocation =
            HookInvocation::from_event(lambda_event(json!({}))).expect("event should decode");
        assert_eq!(invocation.runtime(), None);
    }

    #[test]
    fn tolerates_missing_target_model() {
        let invocation = HookInvocation::from_event(json!({
            "requestData": { "targetType": "AWS::S3::Bucket" }
        }))
        .expect("event should decode");

        assert!(!invocation.targets_lambda_function());
        assert_eq!(invocation.correlation_token(), "");
        assert_eq!(invocation.runtime(), None);
    }

    #[test]
    fn renders_non_string_runtime_as_json_text() {
        let invocation = HookInvocation::from_event(lambda_event(json!({ "Runtime": 18 })))
            .expect("event should decode");
        assert_eq!(invocation.runtime().as_deref(), Some("18"));
    }

    #[test]
    fn tolerates_missing_target_type() {
        let invocation = HookInvocation::from_event(json!({
            "requestData": { "targetModel": { "resourceProperties": {} } }
        }))
        .expect("event should decode");

        assert_eq!(invocation.target_type(), None);
        assert!(!invocation.targets_lambda_function());
    }

    #[test]
    fn non_object_properties_have_no_runtime() {
        let invocation = HookInvocation::from_event(lambda_event(json!(["x"])))
            .expect("event should decode");
        assert_eq!(invocation.runtime(), None);
    }

    #[test]
    fn rejects_event_without_request_data() {
        let error = HookInvocation::from_event(json!({ "clientRequestToken": "token-1" }))
            .expect_err("event should fail");
        assert!(error.message().starts_with("Malformed hook request"));
        assert_eq!(
            salvage_correlation_token(&json!({ "clientRequestToken": "token-1" })),
            "token-1"
        );
    }

    #[test]
    fn success_verdict_omits_error_code() {
        let verdict = HookVerdict::success("token-1", "ok");
        assert_eq!(
            serde_json::to_value(&verdict).expect("verdict should serialize"),
            json!({
                "hookStatus": "SUCCESS",
                "message": "ok",
                "clientRequestToken": "token-1"
            })
        );
    }

    #[test]
    fn failure_verdict_carries_error_code() {
        let verdict = HookVerdict::internal_failure("token-1", "boom");
        let value = serde_json::to_value(&verdict).expect("verdict should serialize");
        assert_eq!(value["hookStatus"], "FAILURE");
        assert_eq!(value["errorCode"], "InternalFailure");
        assert!(!verdict.is_success());
    }
}
