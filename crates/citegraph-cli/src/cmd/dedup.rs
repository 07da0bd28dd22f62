//! `citegraph dedup` - raw table to canonical corpus

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use citegraph_core::{Report, SharedProgress, fmt_num};
use citegraph_corpus::{DedupSummary, deduplicate, table};
use citegraph_store::StageName;
use citegraph_store::stage::DedupInput;

use super::{CORPUS_FILE, default_combined, file_hash, output_root, stage_dir, write_manifest};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct DedupArgs {
    /// Raw table (default: <output>/combined/combined.tsv)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output root directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: DedupArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let root = output_root(args.output, config);
    let input = args.input.unwrap_or_else(|| default_combined(&root));
    execute(&input, &root, progress)?;
    Ok(())
}

/// Deduplicate `input` into `<root>/corpus/corpus.tsv`; returns its path.
pub fn execute(input: &Path, root: &Path, progress: &SharedProgress) -> Result<PathBuf> {
    let raw = table::read_records(input)
        .with_context(|| format!("Cannot load raw table {}", input.display()))?;

    let line = progress.stage_line("dedup");
    line.set_message(format!("{} records", fmt_num(raw.len())));
    let (corpus, summary) = deduplicate(raw);
    line.finish_and_clear();

    let dir = stage_dir(root, StageName::Dedup);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create {}", dir.display()))?;
    let out = dir.join(CORPUS_FILE);
    table::write_records(&out, &corpus)
        .with_context(|| format!("Cannot write {}", out.display()))?;

    write_manifest(
        StageName::Dedup,
        &DedupInput {
            raw_hash: file_hash(input)?,
        },
        &dir,
        &[(CORPUS_FILE, corpus.len())],
    )?;

    report(&summary, &out).emit(progress.is_tty());
    Ok(out)
}

fn report(summary: &DedupSummary, out: &Path) -> Report {
    Report::new("Dedup")
        .row("Input records", fmt_num(summary.input))
        .row("After DOI merge", fmt_num(summary.after_doi_pass))
        .row("Dropped (no DOI)", fmt_num(summary.missing_doi))
        .row("Collapsed DOI duplicates", fmt_num(summary.collapsed))
        .row("Title duplicates", fmt_num(summary.title_duplicates))
        .row("Corpus records", fmt_num(summary.output))
        .row("Output", out.display())
}
