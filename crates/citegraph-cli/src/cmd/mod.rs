//! Subcommands and the output layout they share

pub mod combine;
pub mod dedup;
pub mod graph;
pub mod resolve;
pub mod run;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use citegraph_store::{StageInput, StageManifest, StageName, hash_file};
use serde::Serialize;

use crate::config::Config;

/// Combined raw table, under the combine stage directory
pub const COMBINED_FILE: &str = "combined.tsv";
/// Canonical corpus, under the dedup stage directory
pub const CORPUS_FILE: &str = "corpus.tsv";

/// `-o` if given, else the configured default.
pub fn output_root(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.unwrap_or_else(|| config.output.default_dir.clone())
}

pub fn stage_dir(root: &Path, stage: StageName) -> PathBuf {
    root.join(stage.dir_name())
}

pub fn default_combined(root: &Path) -> PathBuf {
    stage_dir(root, StageName::Combine).join(COMBINED_FILE)
}

pub fn default_corpus(root: &Path) -> PathBuf {
    stage_dir(root, StageName::Dedup).join(CORPUS_FILE)
}

/// Full blake3 hex of one input file.
pub fn file_hash(path: &Path) -> Result<String> {
    let h = hash_file(path).with_context(|| format!("failed to hash {}", path.display()))?;
    Ok(h.to_hex().to_string())
}

/// Record a finished stage in its directory.
pub fn write_manifest<T: Serialize>(
    stage: StageName,
    input: &T,
    dir: &Path,
    row_counts: &[(&str, usize)],
) -> Result<StageManifest> {
    let input = StageInput::new(stage, input)?;
    let manifest = StageManifest::build(&input, dir, row_counts)?;
    manifest.write_to(dir)?;
    Ok(manifest)
}
