//! citegraph-corpus: canonical bibliographic corpus from multi-source exports
//!
//! Records from several literature databases are merged by normalized DOI,
//! gaps are filled from duplicate group-mates, and a second pass by title
//! propagates remaining metadata. The result holds one row per unique DOI.
//!
//! # Example
//!
//! ```ignore
//! use citegraph_corpus::{deduplicate, table};
//!
//! let raw = table::read_records("combined.tsv".as_ref())?;
//! let (corpus, summary) = deduplicate(raw);
//! table::write_records("corpus.tsv".as_ref(), &corpus)?;
//! println!("{} -> {} records", summary.input, summary.output);
//! ```

pub mod authors;
pub mod combine;
pub mod dedup;
pub mod normalize;
pub mod reconcile;
pub mod record;
pub mod table;

// Re-exports
pub use combine::{CombineSummary, SourceTable, combine};
pub use dedup::{DedupSummary, MergePass, deduplicate};
pub use normalize::{normalize, normalize_opt};
pub use reconcile::reconcile;
pub use record::{Field, Record};
pub use table::TableError;
