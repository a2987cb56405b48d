//! Configuration for the sync engine.

use std::time::Duration;

/// Default base URL of the gist API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Configuration for push and pull.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote document API.
    pub api_base: String,
    /// Name of the file holding the snapshot inside the remote document.
    pub file_name: String,
    /// Description attached to the remote document.
    pub description: String,
    /// Request timeout.
    pub timeout: Duration,
    /// How long `success` and `error` stay visible before reverting to idle.
    pub display_interval: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl SyncConfig {
    /// Creates a configuration for the given API base URL.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            file_name: "focus_academy_data.json".to_string(),
            description: "Focus Academy - School Management Backup".to_string(),
            timeout: Duration::from_secs(30),
            display_interval: Duration::from_secs(3),
            user_agent: format!("academy-records/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the snapshot file name.
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Sets the remote document description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how long a finished sync stays visible.
    #[must_use]
    pub fn with_display_interval(mut self, interval: Duration) -> Self {
        self.display_interval = interval;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// URL of the collection endpoint.
    pub(crate) fn documents_url(&self) -> String {
        format!("{}/gists", self.api_base.trim_end_matches('/'))
    }

    /// URL of a single document.
    pub(crate) fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.documents_url(), id)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.api_base, "https://api.github.com");
        assert_eq!(config.file_name, "focus_academy_data.json");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.display_interval, Duration::from_secs(3));
    }

    #[test]
    fn builder_and_urls() {
        let config = SyncConfig::new("http://localhost:8080/")
            .with_file_name("backup.json")
            .with_timeout(Duration::from_secs(5))
            .with_display_interval(Duration::ZERO);

        assert_eq!(config.file_name, "backup.json");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.documents_url(), "http://localhost:8080/gists");
        assert_eq!(config.document_url("abc"), "http://localhost:8080/gists/abc");
    }
}
