use runtime_hook_core::allow_list::RuntimeAllowList;
use serde_json::json;

use crate::logging::log_error;

pub trait ParameterStore {
    /// Returns the stored value, or `None` when the parameter has no value.
    fn get_parameter(&self, name: &str) -> Result<Option<String>, String>;
}

impl<F> ParameterStore for F
where
    F: Fn(&str) -> Result<Option<String>, String>,
{
    fn get_parameter(&self, name: &str) -> Result<Option<String>, String> {
        self(name)
    }
}

/// Reads the runtime allow-list fresh from a parameter store on every call.
pub struct AllowListClient<'a> {
    store: &'a dyn ParameterStore,
}

impl<'a> AllowListClient<'a> {
    pub fn new(store: &'a dyn ParameterStore) -> Self {
        Self { store }
    }

    pub fn fetch(&self, name: &str) -> Result<RuntimeAllowList, String> {
        match self.store.get_parameter(name) {
            Ok(Some(value)) => Ok(RuntimeAllowList::parse(&value)),
            Ok(None) => Ok(RuntimeAllowList::empty()),
            Err(error) => {
                log_error(
                    "allow_list_client",
                    "parameter_fetch_failed",
                    json!({
                        "parameter_name": name,
                        "error": error.clone(),
                    }),
                );
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct RecordingStore {
        value: Option<String>,
        requested: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn new(value: Option<&str>) -> Self {
            Self {
                value: value.map(str::to_string),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().expect("poisoned mutex").clone()
        }
    }

    impl ParameterStore for RecordingStore {
        fn get_parameter(&self, name: &str) -> Result<Option<String>, String> {
            self.requested
                .lock()
                .expect("poisoned mutex")
                .push(name.to_string());
            Ok(self.value.clone())
        }
    }

    #[test]
    fn fetch_splits_stored_value() {
        let store = RecordingStore::new(Some("nodejs18.x,python3.11"));
        let allow_list = AllowListClient::new(&store)
            .fetch("/hooks/permitted-runtimes")
            .expect("fetch should succeed");

        assert_eq!(allow_list.runtimes(), ["nodejs18.x", "python3.11"]);
        assert_eq!(store.requested(), vec!["/hooks/permitted-runtimes"]);
    }

    #[test]
    fn fetch_reads_on_every_call() {
        let store = RecordingStore::new(Some("java17"));
        let client = AllowListClient::new(&store);
        client.fetch("runtimes").expect("first fetch should succeed");
        client.fetch("runtimes").expect("second fetch should succeed");

        assert_eq!(store.requested().len(), 2);
    }

    #[test]
    fn parameter_without_value_yields_empty_allow_list() {
        let store = RecordingStore::new(None);
        let allow_list = AllowListClient::new(&store)
            .fetch("runtimes")
            .expect("fetch should succeed");
        assert!(allow_list.is_empty());
    }

    #[test]
    fn fetch_propagates_store_error() {
        let store = |_: &str| -> Result<Option<String>, String> {
            Err("ParameterNotFound".to_string())
        };
        let error = AllowListClient::new(&store)
            .fetch("runtimes")
            .expect_err("fetch should fail");
        assert_eq!(error, "ParameterNotFound");
    }
}
