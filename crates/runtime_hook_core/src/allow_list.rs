const ALLOW_LIST_SEPARATOR: char = ',';

/// Runtime identifiers an administrator permits, in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeAllowList {
    runtimes: Vec<String>,
}

impl RuntimeAllowList {
    /// Splits a stored parameter value on commas. Entries are kept verbatim,
    /// so membership is exact string equality.
    pub fn parse(raw: &str) -> Self {
        Self {
            runtimes: raw.split(ALLOW_LIST_SEPARATOR).map(str::to_string).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn permits(&self, runtime: &str) -> bool {
        self.runtimes.iter().any(|permitted| permitted == runtime)
    }

    pub fn runtimes(&self) -> &[String] {
        &self.runtimes
    }

    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty()
    }

    pub fn joined(&self) -> String {
        self.runtimes.join(", ")
    }
}
