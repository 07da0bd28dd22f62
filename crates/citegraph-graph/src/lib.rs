//! citegraph-graph: citation graph from the persisted lookup tables
//!
//! Turns the citations/references tables into a directed graph over paper
//! identifiers, attaches corpus metadata (placeholders for works outside
//! the corpus), and writes the matrix, node and edge tables.

pub mod assemble;
pub mod index;
pub mod links;
pub mod output;
pub mod runner;

// Re-exports
pub use assemble::{CitationGraph, Node, NodeScope, assemble};
pub use index::{CorpusIndex, NodeAttributes};
pub use links::LinkTable;
pub use runner::{Config, GraphSummary, run};
