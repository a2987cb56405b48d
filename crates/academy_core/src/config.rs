//! Record store configuration.

/// Configuration for opening a record store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key of the persisted state document in the storage backend.
    pub storage_key: String,

    /// Whether snapshot documents (persisted and exported) are pretty-printed.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: "focus_academy_system_data".to_string(),
            pretty: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage key.
    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets whether documents are pretty-printed.
    #[must_use]
    pub const fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }
}
