//! `citegraph resolve` - look up citations and references per corpus record

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use citegraph_core::SharedProgress;
use citegraph_corpus::table;
use citegraph_resolve::ResolveSummary;
use citegraph_resolve::tables::{
    CITATIONS_FILE, FAILED_FILE, REFERENCES_FILE, RESOLVED_FILE, read_link_rows, read_resolved,
};
use citegraph_store::StageName;
use citegraph_store::stage::ResolveInput;

use super::{default_corpus, file_hash, output_root, stage_dir, write_manifest};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Canonical corpus (default: <output>/corpus/corpus.tsv)
    #[arg(short, long)]
    pub corpus: Option<PathBuf>,

    /// Milliseconds between lookups (overrides config)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Stop after this many lookups
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output root directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ResolveArgs, config: &Config, progress: &SharedProgress) -> Result<ResolveSummary> {
    let root = output_root(args.output, config);
    let corpus = args.corpus.unwrap_or_else(|| default_corpus(&root));
    let mut resolve = config.resolve.clone();
    if let Some(ms) = args.delay_ms {
        resolve.delay_ms = ms;
    }
    execute(&corpus, &root, &resolve, args.limit, progress)
}

/// Resolve the corpus into `<root>/links/`, resuming from what is there.
pub fn execute(
    corpus_path: &Path,
    root: &Path,
    resolve: &crate::config::ResolveConfig,
    limit: Option<usize>,
    progress: &SharedProgress,
) -> Result<ResolveSummary> {
    let corpus = table::read_records(corpus_path)
        .with_context(|| format!("Cannot load corpus {}", corpus_path.display()))?;

    let dir = stage_dir(root, StageName::Resolve);
    let run_config = citegraph_resolve::Config {
        output_dir: dir.clone(),
        api_url: resolve.api_url.clone(),
        api_key: resolve.api_key.clone(),
        delay: resolve.delay(),
        limit,
    };
    if run_config.api_key.is_none() {
        log::debug!("No API key configured, using the unauthenticated rate");
    }

    citegraph_core::install_signal_handlers().context("Cannot install signal handlers")?;
    let summary = citegraph_resolve::run(&run_config, &corpus, progress)?;

    let counts = [
        (CITATIONS_FILE, count_rows(&dir.join(CITATIONS_FILE))?),
        (REFERENCES_FILE, count_rows(&dir.join(REFERENCES_FILE))?),
        (RESOLVED_FILE, read_resolved(&dir.join(RESOLVED_FILE))?.rows.len()),
    ];
    write_manifest(
        StageName::Resolve,
        &ResolveInput {
            corpus_hash: file_hash(corpus_path)?,
            api_url: resolve.api_url.clone(),
        },
        &dir,
        &counts,
    )?;

    summary.report().emit(progress.is_tty());
    if summary.failed > 0 {
        log::info!(
            "Failed lookups are listed in {}",
            dir.join(FAILED_FILE).display()
        );
    }
    Ok(summary)
}

fn count_rows(path: &Path) -> Result<usize> {
    Ok(read_link_rows(path)?.rows.len())
}
