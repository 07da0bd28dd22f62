//! Shared HTTP client behind a blocking interface.
//!
//! Requests run on a small shared tokio runtime; callers stay synchronous,
//! which is all a one-request-at-a-time pipeline needs.

use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-wide HTTP settings, set once from config/CLI before the first request.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("citegraph/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

static HTTP_CONFIG: OnceLock<HttpConfig> = OnceLock::new();

/// Install the global HTTP settings. Returns false if they were already set
/// (or the client was already built with defaults).
pub fn set_http_config(config: HttpConfig) -> bool {
    HTTP_CONFIG.set(config).is_ok()
}

pub fn http_config() -> &'static HttpConfig {
    HTTP_CONFIG.get_or_init(HttpConfig::default)
}

/// Failed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    /// Response status, `None` for transport-level failures
    pub status: Option<u16>,
    pub message: String,
}

impl HttpError {
    /// Build from a reqwest error without its URL (API keys may sit in query strings).
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(s) => write!(f, "HTTP {s}: {}", self.message),
            None => write!(f, "HTTP error: {}", self.message),
        }
    }
}

impl std::error::Error for HttpError {}

static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    let config = http_config();
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .unwrap_or_else(|e| {
            log::warn!("HTTP client builder failed ({e}), falling back to defaults");
            reqwest::Client::new()
        })
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Blocking GET returning the body of a 2xx response.
pub fn get_text(url: &str, headers: &[(&str, &str)]) -> Result<String, HttpError> {
    SHARED_RUNTIME.handle().block_on(async {
        let mut request = http_client().get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(HttpError::from_reqwest)?;
        response.text().await.map_err(HttpError::from_reqwest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_status() {
        let err = HttpError {
            status: Some(404),
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn display_without_status() {
        let err = HttpError {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn default_config_has_user_agent() {
        let config = HttpConfig::default();
        assert!(config.user_agent.starts_with("citegraph/"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
