//! Stage names and content-affecting inputs

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Pipeline stage identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Combine,
    Dedup,
    Resolve,
    Graph,
}

impl StageName {
    pub const ALL: [StageName; 4] = [Self::Combine, Self::Dedup, Self::Resolve, Self::Graph];

    /// Directory under the output root holding this stage's files.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Combine => "combined",
            Self::Dedup => "corpus",
            Self::Resolve => "links",
            Self::Graph => "graph",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Combine => "combine",
            Self::Dedup => "dedup",
            Self::Resolve => "resolve",
            Self::Graph => "graph",
        };
        f.write_str(name)
    }
}

/// Content-affecting configuration of one stage run, as canonical JSON.
#[derive(Debug, Clone)]
pub struct StageInput {
    pub stage: StageName,
    pub config_json: String,
}

impl StageInput {
    /// Serialize `config` (field order is struct order).
    pub fn new<T: Serialize>(stage: StageName, config: &T) -> anyhow::Result<Self> {
        let config_json = serde_json::to_string(config)
            .with_context(|| format!("cannot serialize {stage} stage input"))?;
        Ok(Self { stage, config_json })
    }

    pub fn input_hash(&self) -> blake3::Hash {
        blake3::hash(self.config_json.as_bytes())
    }
}

/// Combine: each source's database tag and file hash.
#[derive(Debug, Clone, Serialize)]
pub struct CombineInput {
    pub sources: Vec<(String, String)>,
    pub fix_authors: bool,
}

/// Dedup: hash of the raw combined table.
#[derive(Debug, Clone, Serialize)]
pub struct DedupInput {
    pub raw_hash: String,
}

/// Resolve: hash of the corpus and the service queried.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveInput {
    pub corpus_hash: String,
    pub api_url: String,
}

/// Graph: upstream content hashes plus graph options.
#[derive(Debug, Clone, Serialize)]
pub struct GraphInput {
    pub corpus_hash: String,
    pub links_hash: String,
    pub scope: String,
    pub write_matrix: bool,
}
