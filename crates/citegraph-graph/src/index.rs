//! Node metadata by identifier

use citegraph_corpus::{Field, Record};
use rustc_hash::FxHashMap;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_ABSTRACT: &str = "Unknown abstract";
pub const UNKNOWN_KEYWORDS: &str = "Unknown keywords";
pub const UNKNOWN_JOURNAL: &str = "Unknown journal";
pub const UNKNOWN_DATABASE: &str = "Unknown database";
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Descriptive columns of one node attribute row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttributes {
    pub label: String,
    pub author: String,
    pub abstract_text: String,
    pub keywords: String,
    pub journal: String,
    pub database: String,
    pub date: String,
}

impl NodeAttributes {
    /// Attributes of a corpus record. Fields the record lacks stay empty;
    /// only a missing title falls back to the identifier.
    pub fn from_record(identifier: &str, record: &Record) -> Self {
        let get = |f: Field| record.get(f).unwrap_or_default().to_string();
        Self {
            label: record.get(Field::Title).unwrap_or(identifier).to_string(),
            author: get(Field::Authors),
            abstract_text: get(Field::Abstract),
            keywords: get(Field::Keywords),
            journal: get(Field::Journal),
            database: get(Field::Database),
            date: get(Field::Date),
        }
    }

    /// Attributes of a work known only from the lookup tables.
    pub fn placeholder(identifier: &str) -> Self {
        Self {
            label: identifier.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            abstract_text: UNKNOWN_ABSTRACT.to_string(),
            keywords: UNKNOWN_KEYWORDS.to_string(),
            journal: UNKNOWN_JOURNAL.to_string(),
            database: UNKNOWN_DATABASE.to_string(),
            date: UNKNOWN_DATE.to_string(),
        }
    }
}

/// Corpus records keyed by normalized identifier.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    by_id: FxHashMap<String, NodeAttributes>,
}

impl CorpusIndex {
    /// Index `records`. Records without an identifier are left out; a later
    /// record replaces an earlier one with the same identifier.
    pub fn from_records(records: &[Record]) -> Self {
        let mut by_id = FxHashMap::default();
        for record in records {
            if let Some(id) = record.identifier() {
                let attrs = NodeAttributes::from_record(&id, record);
                by_id.insert(id, attrs);
            }
        }
        Self { by_id }
    }

    pub fn get(&self, identifier: &str) -> Option<&NodeAttributes> {
        self.by_id.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.by_id.contains_key(identifier)
    }

    /// Metadata for `identifier`, or placeholders.
    pub fn attributes(&self, identifier: &str) -> NodeAttributes {
        self.get(identifier)
            .cloned()
            .unwrap_or_else(|| NodeAttributes::placeholder(identifier))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
