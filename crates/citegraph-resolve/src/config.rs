//! Resolution run configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::api::DEFAULT_API_URL;

/// Pause between lookups the service tolerates without a key
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Runtime configuration for one resolution run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the three lookup tables
    pub output_dir: PathBuf,
    pub api_url: String,
    pub api_key: Option<String>,
    /// Minimum spacing between consecutive lookups
    pub delay: Duration,
    /// Stop after this many lookups (skips do not count)
    pub limit: Option<usize>,
}

impl Config {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            delay: DEFAULT_DELAY,
            limit: None,
        }
    }
}
