//! `citegraph combine` - merge per-database exports into one raw table

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use citegraph_core::{Report, SharedProgress, fmt_num};
use citegraph_corpus::{SourceTable, combine, table};
use citegraph_store::StageName;
use citegraph_store::stage::CombineInput;

use super::{COMBINED_FILE, file_hash, output_root, stage_dir, write_manifest};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct CombineArgs {
    /// Source export as NAME=PATH (repeatable), e.g. "Web of Science=wos.tsv"
    #[arg(short, long = "source", value_name = "NAME=PATH", required = true, value_parser = SourceTable::parse)]
    pub sources: Vec<SourceTable>,

    /// Keep author lists as exported instead of "First Last,..." form
    #[arg(long)]
    pub keep_authors: bool,

    /// Output root directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CombineArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let root = output_root(args.output, config);
    execute(&args.sources, !args.keep_authors, &root, progress)?;
    Ok(())
}

/// Combine `sources` into `<root>/combined/combined.tsv`; returns its path.
pub fn execute(
    sources: &[SourceTable],
    fix_authors: bool,
    root: &Path,
    progress: &SharedProgress,
) -> Result<PathBuf> {
    let dir = stage_dir(root, StageName::Combine);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create {}", dir.display()))?;

    let mut hashed = Vec::with_capacity(sources.len());
    for source in sources {
        hashed.push((source.database.clone(), file_hash(&source.path)?));
    }

    let line = progress.stage_line("combine");
    line.set_message(format!("{} sources", sources.len()));
    let (records, summary) = combine(sources, fix_authors).context("Cannot combine sources")?;
    let out = dir.join(COMBINED_FILE);
    table::write_records(&out, &records)
        .with_context(|| format!("Cannot write {}", out.display()))?;
    line.finish_and_clear();

    write_manifest(
        StageName::Combine,
        &CombineInput {
            sources: hashed,
            fix_authors,
        },
        &dir,
        &[(COMBINED_FILE, records.len())],
    )?;

    let mut report = Report::new("Combine");
    for (database, n) in &summary.per_source {
        report.push(database.as_str(), fmt_num(*n));
    }
    report.push("Total", fmt_num(summary.total));
    if fix_authors {
        report.push("Author lists dropped", fmt_num(summary.authors_dropped));
    }
    report.push("Output", out.display());
    report.emit(progress.is_tty());
    Ok(out)
}
