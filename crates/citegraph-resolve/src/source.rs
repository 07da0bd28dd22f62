//! The external lookup capability and its result types

use citegraph_corpus::{Field, Record, normalize_opt};

use crate::error::ResolveError;

/// Identifier that drives one lookup. DOI wins when both are known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    Doi(String),
    Pmid(String),
}

impl LookupKey {
    /// Pick the lookup identifier from optional DOI and PubMed ID.
    pub fn from_ids(doi: Option<&str>, pmid: Option<&str>) -> Result<Self, ResolveError> {
        if let Some(doi) = normalize_opt(doi) {
            Ok(Self::Doi(doi))
        } else if let Some(pmid) = normalize_opt(pmid) {
            Ok(Self::Pmid(pmid))
        } else {
            Err(ResolveError::NoIdentifier)
        }
    }

    pub fn for_record(record: &Record) -> Result<Self, ResolveError> {
        Self::from_ids(record.get(Field::Doi), record.get(Field::SecondaryId))
    }

    /// Normalized identifier value, as written to the persisted tables.
    pub fn value(&self) -> &str {
        match self {
            Self::Doi(v) | Self::Pmid(v) => v,
        }
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Doi(v) => write!(f, "DOI:{v}"),
            Self::Pmid(v) => write!(f, "PMID:{v}"),
        }
    }
}

/// A work on the other end of a citation relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerPaper {
    /// The service's own paper ID
    pub paper_id: String,
    /// Empty when the service knows no DOI for the peer
    pub doi: String,
}

impl PeerPaper {
    pub fn new(paper_id: impl Into<String>, doi: impl Into<String>) -> Self {
        Self {
            paper_id: paper_id.into(),
            doi: doi.into(),
        }
    }
}

/// Both directions for one record: who cites it, and whom it cites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperLinks {
    pub citations: Vec<PeerPaper>,
    pub references: Vec<PeerPaper>,
}

impl PaperLinks {
    pub fn is_empty(&self) -> bool {
        self.citations.is_empty() && self.references.is_empty()
    }
}

/// External identifier-keyed lookup of citing and cited works.
pub trait CitationSource {
    fn lookup(&self, key: &LookupKey) -> Result<PaperLinks, ResolveError>;
}

/// Resolve one record: choose its key, then ask the source.
pub fn resolve(
    source: &dyn CitationSource,
    doi: Option<&str>,
    pmid: Option<&str>,
) -> Result<PaperLinks, ResolveError> {
    let key = LookupKey::from_ids(doi, pmid)?;
    source.lookup(&key)
}
