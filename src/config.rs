//! Runtime settings for talking to researchmap.

use std::time::Duration;

/// Default researchmap API URL
pub const DEFAULT_BASE_URL: &str = "https://api.researchmap.jp";

/// Pause after each API call
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(200);

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Record source settings
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// API base URL (user id and endpoint are appended as path segments)
    pub base_url: String,
    /// Pause after every call, keeping calls strictly spaced
    pub request_delay: Duration,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
