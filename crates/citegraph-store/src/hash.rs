//! Blake3 content hashing

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use anyhow::Context;

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> io::Result<blake3::Hash> {
    let mut hasher = blake3::Hasher::new();
    hasher.update_mmap(path)?;
    Ok(hasher.finalize())
}

/// First 8 hex characters.
pub fn short_hash(hash: &blake3::Hash) -> String {
    hash.to_hex()[..8].to_string()
}

/// Hash every regular file directly under `dir` except those in `skip`.
///
/// Returns per-file hex hashes keyed by file name, and one combined hash
/// over the files in name order. An empty directory hashes like `b"empty"`.
pub fn hash_dir(
    dir: &Path,
    skip: &[&str],
) -> anyhow::Result<(BTreeMap<String, String>, blake3::Hash)> {
    let pattern = dir.join("*");
    let mut paths: Vec<_> = glob::glob(&pattern.to_string_lossy())
        .context("invalid glob pattern")?
        .filter_map(|e| e.ok())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut files = BTreeMap::new();
    let mut combined = blake3::Hasher::new();
    for path in &paths {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if skip.contains(&name.as_str()) {
            continue;
        }
        let h = hash_file(path).with_context(|| format!("failed to hash {}", path.display()))?;
        combined.update(h.as_bytes());
        files.insert(name, h.to_hex().to_string());
    }

    let content = if files.is_empty() {
        blake3::hash(b"empty")
    } else {
        combined.finalize()
    };
    Ok((files, content))
}
