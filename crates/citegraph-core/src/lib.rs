//! citegraph core - shared infrastructure for the corpus and citation-graph pipeline
//!
//! Logging, progress reporting, cancellation, the shared HTTP client and
//! the rate limiter used by every stage that talks to an external service.

pub mod http;
pub mod logging;
pub mod progress;
pub mod rate_limit;
pub mod report;
pub mod shutdown;

// Re-exports for convenience
pub use http::{HttpConfig, SHARED_RUNTIME, http_client, http_config, set_http_config};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use rate_limit::RateLimiter;
pub use report::Report;
pub use shutdown::{install_signal_handlers, shutdown_flag};
