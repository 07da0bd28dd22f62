//! Persisted lookup tables.
//!
//! Four comma-separated files in the output directory:
//!
//! - `citations.csv`: one row per (record, citing work)
//! - `references.csv`: one row per (record, referenced work)
//! - `resolved.csv`: one row per successful lookup, edges or not
//! - `failed_fetches.csv`: one row per failed lookup
//!
//! All four are append-only. A file is created with its header the first
//! time it is opened; later runs append below what is there.

use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::Context;
use citegraph_corpus::{Field, Record};

use crate::error::ResolveError;
use crate::source::{PaperLinks, PeerPaper};

pub const CITATIONS_FILE: &str = "citations.csv";
pub const REFERENCES_FILE: &str = "references.csv";
pub const RESOLVED_FILE: &str = "resolved.csv";
pub const FAILED_FILE: &str = "failed_fetches.csv";

pub const LINK_HEADER: [&str; 3] = ["Identifier", "Peer Paper Internal ID", "Peer DOI"];
pub const RESOLVED_HEADER: [&str; 1] = ["Identifier"];
pub const FAILED_HEADER: [&str; 5] = ["Title", "DOI", "PubMed ID", "Database", "Error Message"];

/// A row with fewer fields than its table needs. Skipped with a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based line number in the file
    pub line: u64,
    pub found: usize,
    pub expected: usize,
}

impl std::fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} fields, expected {}",
            self.line, self.found, self.expected
        )
    }
}

/// One row of `citations.csv` or `references.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub identifier: String,
    pub peer_id: String,
    pub peer_doi: String,
}

/// One row of `failed_fetches.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRow {
    pub title: String,
    pub doi: String,
    pub pmid: String,
    pub database: String,
    pub message: String,
}

impl FailedRow {
    /// Normalized identifier the failed lookup was for.
    pub fn identifier(&self) -> Option<String> {
        citegraph_corpus::normalize_opt(Some(self.doi.as_str()))
            .or_else(|| citegraph_corpus::normalize_opt(Some(self.pmid.as_str())))
    }

    pub fn is_permanent(&self) -> bool {
        ResolveError::is_permanent_message(&self.message)
    }
}

/// Rows read from one table plus the rows that had to be skipped.
#[derive(Debug, Default)]
pub struct Loaded<T> {
    pub rows: Vec<T>,
    pub malformed: Vec<MalformedRow>,
}

fn read_rows<T>(
    path: &Path,
    expected: usize,
    build: impl Fn(&csv::StringRecord) -> T,
) -> anyhow::Result<Loaded<T>> {
    let mut loaded = Loaded {
        rows: Vec::new(),
        malformed: Vec::new(),
    };
    if !path.exists() {
        return Ok(loaded);
    }
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;

    for row in rdr.records() {
        let row = row.with_context(|| format!("Cannot read {}", path.display()))?;
        if row.len() < expected {
            let bad = MalformedRow {
                line: row.position().map_or(0, |p| p.line()),
                found: row.len(),
                expected,
            };
            log::warn!("{}: skipping {bad}", path.display());
            loaded.malformed.push(bad);
            continue;
        }
        loaded.rows.push(build(&row));
    }
    Ok(loaded)
}

fn field(row: &csv::StringRecord, idx: usize) -> String {
    row.get(idx).unwrap_or_default().to_string()
}

/// Read a citations or references table. A missing file reads as empty.
pub fn read_link_rows(path: &Path) -> anyhow::Result<Loaded<LinkRow>> {
    read_rows(path, LINK_HEADER.len(), |row| LinkRow {
        identifier: field(row, 0),
        peer_id: field(row, 1),
        peer_doi: field(row, 2),
    })
}

/// Read the resolved-identifier table. A missing file reads as empty.
pub fn read_resolved(path: &Path) -> anyhow::Result<Loaded<String>> {
    read_rows(path, RESOLVED_HEADER.len(), |row| field(row, 0))
}

/// Read the failed-fetch table. A missing file reads as empty.
pub fn read_failed_rows(path: &Path) -> anyhow::Result<Loaded<FailedRow>> {
    read_rows(path, FAILED_HEADER.len(), |row| FailedRow {
        title: field(row, 0),
        doi: field(row, 1),
        pmid: field(row, 2),
        database: field(row, 3),
        message: field(row, 4),
    })
}

/// Open for append, writing `header` first if the file is new or empty.
fn open_append(path: &Path, header: &[&str]) -> anyhow::Result<csv::Writer<File>> {
    let is_new = std::fs::metadata(path).map_or(true, |m| m.len() == 0);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open {} for append", path.display()))?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if is_new {
        wtr.write_record(header)
            .with_context(|| format!("Cannot write header to {}", path.display()))?;
        wtr.flush()?;
    }
    Ok(wtr)
}

/// Append handles for the four lookup tables.
pub struct LinkStore {
    citations: csv::Writer<File>,
    references: csv::Writer<File>,
    resolved: csv::Writer<File>,
    failed: csv::Writer<File>,
}

impl LinkStore {
    /// Open (creating if needed) all four tables under `dir`.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create {}", dir.display()))?;
        Ok(Self {
            citations: open_append(&dir.join(CITATIONS_FILE), &LINK_HEADER)?,
            references: open_append(&dir.join(REFERENCES_FILE), &LINK_HEADER)?,
            resolved: open_append(&dir.join(RESOLVED_FILE), &RESOLVED_HEADER)?,
            failed: open_append(&dir.join(FAILED_FILE), &FAILED_HEADER)?,
        })
    }

    /// Append one lookup's results. Flushed before returning so an
    /// interrupted run loses at most the record in flight.
    ///
    /// The identifier goes to the resolved table last, after its edges.
    pub fn append_links(&mut self, identifier: &str, links: &PaperLinks) -> anyhow::Result<()> {
        write_peers(&mut self.citations, identifier, &links.citations)
            .context("Cannot append to citations table")?;
        write_peers(&mut self.references, identifier, &links.references)
            .context("Cannot append to references table")?;
        self.resolved
            .write_record([identifier])
            .context("Cannot append to resolved table")?;
        self.resolved.flush()?;
        Ok(())
    }

    pub fn append_failure(&mut self, record: &Record, error: &ResolveError) -> anyhow::Result<()> {
        let get = |f: Field| record.get(f).unwrap_or_default();
        let message = error.to_string();
        self.failed
            .write_record([
                get(Field::Title),
                get(Field::Doi),
                get(Field::SecondaryId),
                get(Field::Database),
                message.as_str(),
            ])
            .context("Cannot append to failed-fetch table")?;
        self.failed.flush()?;
        Ok(())
    }
}

fn write_peers(
    wtr: &mut csv::Writer<File>,
    identifier: &str,
    peers: &[PeerPaper],
) -> anyhow::Result<()> {
    for peer in peers {
        wtr.write_record([identifier, peer.paper_id.as_str(), peer.doi.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
