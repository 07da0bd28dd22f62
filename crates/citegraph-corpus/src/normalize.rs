//! Identifier normalization shared by deduplication and graph keys.
//!
//! DOIs are case-insensitive and PubMed IDs are digits, so lower-casing and
//! trimming is enough for exact comparison across databases.

/// Lower-case and trim an identifier. Absent input becomes the empty string.
pub fn normalize(id: Option<&str>) -> String {
    id.map(|s| s.trim().to_lowercase()).unwrap_or_default()
}

/// Like [`normalize`], but `None` when nothing is left.
pub fn normalize_opt(id: Option<&str>) -> Option<String> {
    let n = normalize(id);
    (!n.is_empty()).then_some(n)
}
