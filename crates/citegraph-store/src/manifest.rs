//! Stage manifest: input hash, content hashes, row counts

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hash;
use crate::stage::{StageInput, StageName};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Written next to a stage's output files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageManifest {
    pub stage: StageName,
    /// Blake3 of `config_json`
    pub input_hash: String,
    pub config_json: String,
    /// File name to blake3 hex
    pub file_hashes: BTreeMap<String, String>,
    /// Combined hash over `file_hashes` in name order
    pub content_hash: String,
    /// Rows per output table
    #[serde(default)]
    pub row_counts: BTreeMap<String, usize>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl StageManifest {
    /// Hash the files currently in `dir` and record them against `input`.
    pub fn build(
        input: &StageInput,
        dir: &Path,
        row_counts: &[(&str, usize)],
    ) -> Result<Self> {
        let (file_hashes, content) = hash::hash_dir(dir, &[MANIFEST_FILE])?;
        Ok(Self {
            stage: input.stage,
            input_hash: input.input_hash().to_hex().to_string(),
            config_json: input.config_json.clone(),
            file_hashes,
            content_hash: content.to_hex().to_string(),
            row_counts: row_counts
                .iter()
                .map(|(name, n)| (name.to_string(), *n))
                .collect(),
            created_at: chrono::Utc::now(),
        })
    }

    pub fn short_content_hash(&self) -> &str {
        self.content_hash.get(..8).unwrap_or(&self.content_hash)
    }

    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).context("failed to serialize manifest")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::debug!("{}: {} {}", path.display(), self.stage, self.short_content_hash());
        Ok(())
    }

    pub fn read_from(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Manifests of every stage directory under `root`, in stage order.
    /// Directories whose manifest cannot be parsed are logged and skipped.
    pub fn find_all(root: &Path) -> Result<Vec<(PathBuf, Self)>> {
        let pattern = root.join("*").join(MANIFEST_FILE);
        let mut found = Vec::new();
        for path in glob::glob(&pattern.to_string_lossy())
            .context("invalid glob pattern")?
            .filter_map(|e| e.ok())
        {
            let Some(dir) = path.parent() else { continue };
            match Self::read_from(dir) {
                Ok(m) => found.push((dir.to_path_buf(), m)),
                Err(e) => log::warn!("{e:#}"),
            }
        }
        found.sort_by_key(|(_, m)| StageName::ALL.iter().position(|s| *s == m.stage));
        Ok(found)
    }
}
