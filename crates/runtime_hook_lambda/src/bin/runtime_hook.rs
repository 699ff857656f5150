use aws_sdk_ssm::error::DisplayErrorContext;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use runtime_hook_core::contract::HookVerdict;
use runtime_hook_lambda::adapters::parameter_store::ParameterStore;
use runtime_hook_lambda::config::HookConfig;
use runtime_hook_lambda::handlers::runtime_compliance::handle_hook_event;
use serde_json::Value;

#[derive(Clone)]
struct SsmParameterStore {
    ssm_client: aws_sdk_ssm::Client,
}

impl ParameterStore for SsmParameterStore {
    fn get_parameter(&self, name: &str) -> Result<Option<String>, String> {
        let parameter_name = name.to_string();
        let client = self.ssm_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_parameter()
                    .name(parameter_name)
                    .send()
                    .await
                    .map(|output| {
                        output
                            .parameter()
                            .and_then(|parameter| parameter.value())
                            .map(str::to_string)
                    })
                    .map_err(|error| {
                        format!(
                            "failed to read parameter from ssm: {}",
                            DisplayErrorContext(&error)
                        )
                    })
            })
        })
    }
}

async fn handle_request(
    event: LambdaEvent<Value>,
    store: &SsmParameterStore,
) -> Result<HookVerdict, Error> {
    let config = HookConfig::from_env();
    Ok(handle_hook_event(
        event.payload,
        config.permitted_runtimes_param(),
        store,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = SsmParameterStore {
        ssm_client: aws_sdk_ssm::Client::new(&aws_config),
    };

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let store = store.clone();
        async move { handle_request(event, &store).await }
    }))
    .await
}
