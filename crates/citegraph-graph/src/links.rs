//! Identifier -> peers mapping loaded from a lookup table

use std::path::Path;

use anyhow::Context;
use citegraph_corpus::normalize_opt;
use citegraph_resolve::tables::{LinkRow, read_link_rows};
use rustc_hash::FxHashMap;

/// Ordered `identifier -> [peer identifier]` mapping.
///
/// Keys keep the order of their first row; peers keep row order. Both sides
/// go through the corpus identifier normalizer. Rows with an empty peer DOI
/// are not kept.
#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    entries: Vec<(String, Vec<String>)>,
    index: FxHashMap<String, usize>,
    /// Rows dropped for an empty peer DOI
    pub empty_peers: usize,
    /// Rows dropped for having too few fields
    pub malformed: usize,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a citations or references table. The file must exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "{} not found", path.display());
        let loaded =
            read_link_rows(path).with_context(|| format!("Cannot load {}", path.display()))?;
        let mut table = Self::from_rows(loaded.rows);
        table.malformed = loaded.malformed.len();
        log::debug!(
            "{}: {} keys, {} peers ({} empty peers dropped)",
            path.display(),
            table.len(),
            table.peer_count(),
            table.empty_peers
        );
        Ok(table)
    }

    pub fn from_rows(rows: impl IntoIterator<Item = LinkRow>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push(&row.identifier, &row.peer_doi);
        }
        table
    }

    /// Add one `(key, peer)` row.
    pub fn push(&mut self, key: &str, peer: &str) {
        let Some(key) = normalize_opt(Some(key)) else {
            return;
        };
        let Some(peer) = normalize_opt(Some(peer)) else {
            self.empty_peers += 1;
            return;
        };
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.clone(), Vec::new()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[idx].1.push(peer);
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn peers(&self, key: &str) -> Option<&[String]> {
        self.index.get(key).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn peer_count(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for LinkTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, peer) in iter {
            table.push(key, peer);
        }
        table
    }
}
