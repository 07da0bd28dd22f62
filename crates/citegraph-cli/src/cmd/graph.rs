//! `citegraph graph` - citation graph from corpus and lookup tables

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use citegraph_core::SharedProgress;
use citegraph_graph::output::{EDGES_FILE, NODES_FILE};
use citegraph_graph::{GraphSummary, NodeScope};
use citegraph_store::StageName;
use citegraph_store::stage::GraphInput;

use super::{default_corpus, output_root, stage_dir, write_manifest};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Canonical corpus (default: <output>/corpus/corpus.tsv)
    #[arg(short, long)]
    pub corpus: Option<PathBuf>,

    /// Which identifiers become nodes: touched or corpus (overrides config)
    #[arg(long, value_parser = parse_scope)]
    pub scope: Option<NodeScope>,

    /// Skip the square citation matrix
    #[arg(long)]
    pub no_matrix: bool,

    /// Output root directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_scope(s: &str) -> Result<NodeScope, String> {
    NodeScope::from_name(s).ok_or_else(|| format!("unknown scope {s:?}, expected touched or corpus"))
}

pub fn run(args: GraphArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let root = output_root(args.output, config);
    let corpus = args.corpus.unwrap_or_else(|| default_corpus(&root));
    let scope = args.scope.unwrap_or(config.graph.scope);
    let write_matrix = config.graph.write_matrix && !args.no_matrix;
    execute(&corpus, &root, scope, write_matrix, progress)?;
    Ok(())
}

/// Assemble from `<root>/links/` into `<root>/graph/`.
pub fn execute(
    corpus_path: &Path,
    root: &Path,
    scope: NodeScope,
    write_matrix: bool,
    progress: &SharedProgress,
) -> Result<GraphSummary> {
    let links_dir = stage_dir(root, StageName::Resolve);
    let dir = stage_dir(root, StageName::Graph);
    let config = citegraph_graph::Config {
        corpus_path: corpus_path.to_path_buf(),
        links_dir: links_dir.clone(),
        output_dir: dir.clone(),
        scope,
        write_matrix,
    };
    let summary = citegraph_graph::run(&config, progress)?;

    let (_, links_hash) = citegraph_store::hash_dir(&links_dir, &[citegraph_store::MANIFEST_FILE])?;
    write_manifest(
        StageName::Graph,
        &GraphInput {
            corpus_hash: super::file_hash(corpus_path)?,
            links_hash: links_hash.to_hex().to_string(),
            scope: scope.to_string(),
            write_matrix,
        },
        &dir,
        &[(NODES_FILE, summary.nodes), (EDGES_FILE, summary.edges)],
    )?;

    let is_tty = progress.is_tty();
    summary.report().emit(is_tty);
    summary.most_cited_report().emit(is_tty);
    Ok(summary)
}
