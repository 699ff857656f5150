pub const PERMITTED_RUNTIMES_PARAM_ENV: &str = "PERMITTED_RUNTIMES_PARAM";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookConfig {
    pub permitted_runtimes_param: Option<String>,
}

impl HookConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values are treated the same as an unset variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let permitted_runtimes_param = lookup(PERMITTED_RUNTIMES_PARAM_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            permitted_runtimes_param,
        }
    }

    pub fn permitted_runtimes_param(&self) -> Option<&str> {
        self.permitted_runtimes_param.as_deref()
    }
}
