//! Cross-source deduplication.
//!
//! Stages, each finished before the next starts:
//! 1. DOI pass: group by normalized DOI, fill gaps, drop exact duplicates
//! 2. DOI-presence filter: records still without a DOI leave the corpus
//! 3. Exact-DOI collapse: first row per DOI wins
//! 4. Title pass: strip one trailing period, group by title, fill gaps
//!    (PubMed ID excluded: a dataset mirror can share a paper's title)
//!
//! Passes 1 and 4 are the same [`MergePass`] with different keys and columns.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::normalize::normalize_opt;
use crate::reconcile::reconcile;
use crate::record::{Field, Record};

/// Columns filled from DOI group-mates
pub const DOI_PASS_COLUMNS: &[Field] = &[
    Field::Title,
    Field::Authors,
    Field::Date,
    Field::Keywords,
    Field::Abstract,
    Field::Journal,
    Field::Database,
    Field::SecondaryId,
];

/// Columns filled from title group-mates
pub const TITLE_PASS_COLUMNS: &[Field] = &[
    Field::Authors,
    Field::Date,
    Field::Keywords,
    Field::Abstract,
    Field::Journal,
    Field::Database,
];

/// Group, fill, collapse.
///
/// Records whose key is `None` form singleton groups and are never merged
/// with each other.
#[derive(Clone, Copy)]
pub struct MergePass {
    pub name: &'static str,
    pub key: fn(&Record) -> Option<String>,
    pub columns: &'static [Field],
}

impl std::fmt::Debug for MergePass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergePass")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl MergePass {
    /// Keyed by the (already normalized) DOI.
    pub const DOI: Self = Self {
        name: "doi",
        key: doi_key,
        columns: DOI_PASS_COLUMNS,
    };

    /// Keyed by the exact title.
    pub const TITLE: Self = Self {
        name: "title",
        key: title_key,
        columns: TITLE_PASS_COLUMNS,
    };

    /// Fill every multi-row group, then drop rows identical to an earlier one.
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        let mut groups: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (idx, record) in records.iter().enumerate() {
            if let Some(key) = (self.key)(record) {
                groups.entry(key).or_default().push(idx);
            }
        }

        let mut merged = records;
        let mut multi = 0usize;
        for (key, indices) in &groups {
            if indices.len() < 2 {
                continue;
            }
            multi += 1;
            let rows: Vec<Record> = indices.iter().map(|&i| merged[i].clone()).collect();
            for (&i, row) in indices.iter().zip(reconcile(key, self.columns, &rows)) {
                merged[i] = row;
            }
        }
        log::debug!(
            "{} pass: {} keys, {multi} duplicate groups",
            self.name,
            groups.len()
        );

        drop_exact_duplicates(merged)
    }
}

fn doi_key(record: &Record) -> Option<String> {
    record.get(Field::Doi).map(str::to_string)
}

fn title_key(record: &Record) -> Option<String> {
    record.get(Field::Title).map(str::to_string)
}

/// Keep the first occurrence of every distinct row.
pub fn drop_exact_duplicates(records: Vec<Record>) -> Vec<Record> {
    let keep: Vec<bool> = {
        let mut seen = FxHashSet::default();
        records.iter().map(|r| seen.insert(r)).collect()
    };
    records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect()
}

/// Replace every DOI by its normalized form (blank DOIs become missing).
pub fn normalize_dois(records: &mut [Record]) {
    for record in records {
        record.doi = normalize_opt(record.doi.as_deref());
    }
}

/// Stage 2: drop records without a DOI.
pub fn drop_missing_doi(records: Vec<Record>) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| !r.is_missing(Field::Doi))
        .collect()
}

/// Stage 3: keep the first record per normalized DOI.
pub fn collapse_by_doi(records: Vec<Record>) -> Vec<Record> {
    let mut seen = FxHashSet::default();
    records
        .into_iter()
        .filter(|r| match normalize_opt(r.get(Field::Doi)) {
            Some(doi) => seen.insert(doi),
            None => true,
        })
        .collect()
}

/// Remove exactly one trailing period. "Title.." keeps one.
pub fn strip_trailing_period(title: &str) -> &str {
    title.strip_suffix('.').unwrap_or(title)
}

/// Row counts after each stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupSummary {
    pub input: usize,
    /// Rows left after the DOI pass dropped exact duplicates
    pub after_doi_pass: usize,
    /// Rows removed by the DOI-presence filter
    pub missing_doi: usize,
    /// Rows removed by the exact-DOI collapse
    pub collapsed: usize,
    /// Rows removed by the title pass (exact duplicates after fill)
    pub title_duplicates: usize,
    pub output: usize,
}

/// Run all four stages. Output order follows first appearance in `records`.
pub fn deduplicate(mut records: Vec<Record>) -> (Vec<Record>, DedupSummary) {
    let mut summary = DedupSummary {
        input: records.len(),
        ..Default::default()
    };

    normalize_dois(&mut records);
    let records = MergePass::DOI.apply(records);
    summary.after_doi_pass = records.len();

    let before = records.len();
    let records = drop_missing_doi(records);
    summary.missing_doi = before - records.len();

    let before = records.len();
    let mut records = collapse_by_doi(records);
    summary.collapsed = before - records.len();

    for record in &mut records {
        if let Some(title) = record.title.take() {
            record.set(Field::Title, strip_trailing_period(&title));
        }
    }
    let before = records.len();
    let records = MergePass::TITLE.apply(records);
    summary.title_duplicates = before - records.len();
    summary.output = records.len();

    log::info!(
        "dedup: {} -> {} records ({} without DOI, {} collapsed)",
        summary.input,
        summary.output,
        summary.missing_doi,
        summary.collapsed
    );
    (records, summary)
}
