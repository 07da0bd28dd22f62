//! `citegraph run` - combine (optional), dedup, resolve, graph in sequence

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use citegraph_core::SharedProgress;
use citegraph_corpus::SourceTable;

use super::{default_combined, output_root};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Raw table to start from (default: <output>/combined/combined.tsv)
    #[arg(short, long, conflicts_with = "sources")]
    pub input: Option<PathBuf>,

    /// Start by combining these exports (NAME=PATH, repeatable)
    #[arg(short, long = "source", value_name = "NAME=PATH", value_parser = SourceTable::parse)]
    pub sources: Vec<SourceTable>,

    /// Stop resolution after this many lookups
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output root directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: RunArgs, config: &Config, progress: &SharedProgress) -> Result<ExitCode> {
    let root = output_root(args.output, config);
    log::info!("Pipeline output: {}", root.display());

    let raw = if !args.sources.is_empty() {
        super::combine::execute(&args.sources, true, &root, progress)?
    } else {
        args.input.unwrap_or_else(|| default_combined(&root))
    };

    let corpus = super::dedup::execute(&raw, &root, progress)?;

    let summary = super::resolve::execute(&corpus, &root, &config.resolve, args.limit, progress)?;
    if summary.interrupted {
        log::warn!("Resolution interrupted; rerun to resume, graph not built");
        return Ok(ExitCode::from(130));
    }

    super::graph::execute(
        &corpus,
        &root,
        config.graph.scope,
        config.graph.write_matrix,
        progress,
    )?;
    Ok(ExitCode::SUCCESS)
}
