//! Resume state rebuilt from the persisted tables

use std::path::Path;

use rustc_hash::FxHashSet;

use crate::tables::{self, CITATIONS_FILE, FAILED_FILE, REFERENCES_FILE, RESOLVED_FILE};

/// Identifiers that need no further lookup.
///
/// An identifier is processed once a lookup for it succeeded (listed in the
/// resolved table, or owning a row in the citations or references table), or
/// once it has a failure row that re-running cannot fix (the service answered
/// 404). Transient failures are retried on the next run.
#[derive(Debug, Default, Clone)]
pub struct ProcessedSet {
    ids: FxHashSet<String>,
    /// Rows skipped while loading
    pub malformed: usize,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the tables under `dir`. Missing files count as empty.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let mut set = Self::new();

        for name in [CITATIONS_FILE, REFERENCES_FILE] {
            let loaded = tables::read_link_rows(&dir.join(name))?;
            set.malformed += loaded.malformed.len();
            for row in loaded.rows {
                if let Some(id) = citegraph_corpus::normalize_opt(Some(row.identifier.as_str())) {
                    set.ids.insert(id);
                }
            }
        }

        let resolved = tables::read_resolved(&dir.join(RESOLVED_FILE))?;
        set.malformed += resolved.malformed.len();
        for id in resolved.rows {
            if let Some(id) = citegraph_corpus::normalize_opt(Some(id.as_str())) {
                set.ids.insert(id);
            }
        }

        let failed = tables::read_failed_rows(&dir.join(FAILED_FILE))?;
        set.malformed += failed.malformed.len();
        let mut permanent = 0usize;
        for row in failed.rows.iter().filter(|r| r.is_permanent()) {
            if let Some(id) = row.identifier() {
                set.ids.insert(id);
                permanent += 1;
            }
        }

        log::debug!(
            "{}: {} processed identifiers ({permanent} permanent failures)",
            dir.display(),
            set.ids.len()
        );
        Ok(set)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.ids.contains(identifier)
    }

    pub fn insert(&mut self, identifier: impl Into<String>) -> bool {
        self.ids.insert(identifier.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
