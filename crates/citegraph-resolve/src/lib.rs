//! citegraph-resolve: citation and reference lookup per corpus record
//!
//! Walks the canonical corpus one record at a time, asks an external
//! [`CitationSource`] (Semantic Scholar by default) which works cite it and
//! which it cites, and appends the answers to persisted tables. The tables
//! double as resume state: identifiers already recorded are skipped.

pub mod api;
pub mod config;
pub mod error;
pub mod processed;
pub mod runner;
pub mod source;
pub mod tables;

// Re-exports
pub use api::SemanticScholarClient;
pub use config::Config;
pub use error::ResolveError;
pub use processed::ProcessedSet;
pub use runner::{ResolveSummary, run, run_resolution};
pub use source::{CitationSource, LookupKey, PaperLinks, PeerPaper, resolve};
pub use tables::LinkStore;
