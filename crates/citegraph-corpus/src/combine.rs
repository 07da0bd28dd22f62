//! Concatenate per-database exports into one raw table.
//!
//! Each source must already use the corpus column layout; the database tag
//! comes from the caller, not from the file.

use std::path::PathBuf;

use crate::authors::normalize_authors;
use crate::record::{Field, Record};
use crate::table::{self, TableError};

/// One export file and the database it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    pub database: String,
    pub path: PathBuf,
}

impl SourceTable {
    /// Parse `NAME=PATH` (e.g. `"Web of Science=wos.tsv"`).
    pub fn parse(arg: &str) -> Result<Self, String> {
        let (name, path) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=PATH, got {arg:?}"))?;
        let name = name.trim();
        let path = path.trim();
        if name.is_empty() || path.is_empty() {
            return Err(format!("expected NAME=PATH, got {arg:?}"));
        }
        Ok(Self {
            database: name.to_string(),
            path: PathBuf::from(path),
        })
    }
}

/// Per-source row counts.
#[derive(Debug, Clone, Default)]
pub struct CombineSummary {
    pub per_source: Vec<(String, usize)>,
    /// Rows whose author list was emptied by normalization
    pub authors_dropped: usize,
    pub total: usize,
}

/// Read every source, tag its rows, optionally normalize author lists.
pub fn combine(
    sources: &[SourceTable],
    fix_authors: bool,
) -> Result<(Vec<Record>, CombineSummary), TableError> {
    let mut all = Vec::new();
    let mut summary = CombineSummary::default();

    for source in sources {
        let mut records = table::read_records(&source.path)?;
        for record in &mut records {
            record.set(Field::Database, source.database.as_str());
            if fix_authors {
                if let Some(raw) = record.authors.take().filter(|a| !a.trim().is_empty()) {
                    match normalize_authors(&raw) {
                        Some(fixed) => record.authors = Some(fixed),
                        None => summary.authors_dropped += 1,
                    }
                }
            }
        }
        log::info!("{}: {} records", source.database, records.len());
        summary.per_source.push((source.database.clone(), records.len()));
        all.extend(records);
    }

    summary.total = all.len();
    Ok((all, summary))
}
