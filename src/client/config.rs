use std::time::Duration;

use super::error::ClientError;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default status polling period
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default upper bound on a single status request
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection settings for the backend service
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://127.0.0.1:5000`
    pub base_url: String,
    /// Period between status polls
    pub poll_interval: Duration,
    /// Timeout for one status request
    pub poll_timeout: Duration,
    /// Timeout for commands; `None` waits for the transport to give up
    pub command_timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BackendConfig {
    /// Configuration for `base_url` with default timings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            command_timeout: None,
            user_agent: format!("wheatstone/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the polling period in milliseconds
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval = Duration::from_millis(ms);
        self
    }

    /// Set the status request timeout in milliseconds
    pub fn poll_timeout_ms(mut self, ms: u64) -> Self {
        self.poll_timeout = Duration::from_millis(ms);
        self
    }

    /// Bound every command by a timeout in milliseconds
    pub fn command_timeout_ms(mut self, ms: u64) -> Self {
        self.command_timeout = Some(Duration::from_millis(ms));
        self
    }

    /// Check the configuration before use
    pub fn validate(&self) -> Result<(), ClientError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "Base URL must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(ClientError::Config("Poll interval must be positive".into()));
        }
        Ok(())
    }

    /// Absolute URL of an API path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
