//! Graph stage: load inputs, assemble, write outputs

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use citegraph_core::{ProgressContext, Report, fmt_num};
use citegraph_corpus::table::read_records;
use citegraph_resolve::tables::{CITATIONS_FILE, REFERENCES_FILE};

use crate::assemble::{CitationGraph, NodeScope, assemble};
use crate::index::CorpusIndex;
use crate::links::LinkTable;
use crate::output::write_all;

/// Nodes listed in the most-cited report
pub const TOP_CITED: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Canonical corpus table
    pub corpus_path: PathBuf,
    /// Directory with the citations and references tables
    pub links_dir: PathBuf,
    pub output_dir: PathBuf,
    pub scope: NodeScope,
    pub write_matrix: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GraphSummary {
    pub corpus_records: usize,
    pub nodes: usize,
    pub placeholder_nodes: usize,
    pub edges: usize,
    pub empty_peers: usize,
    pub malformed_rows: usize,
    /// `(label, citation count)`, most cited first
    pub most_cited: Vec<(String, usize)>,
    pub elapsed: Duration,
}

impl GraphSummary {
    fn new(graph: &CitationGraph, corpus_records: usize) -> Self {
        Self {
            corpus_records,
            nodes: graph.node_count(),
            placeholder_nodes: graph.placeholder_count(),
            edges: graph.edge_count(),
            most_cited: graph
                .most_cited(TOP_CITED)
                .into_iter()
                .map(|(node, count)| (node.attributes.label.clone(), count))
                .collect(),
            ..Default::default()
        }
    }

    pub fn report(&self) -> Report {
        Report::new("Graph")
            .row("Corpus records", fmt_num(self.corpus_records))
            .row("Nodes", fmt_num(self.nodes))
            .row("  outside corpus", fmt_num(self.placeholder_nodes))
            .row("Edges", fmt_num(self.edges))
            .row("Empty peers skipped", fmt_num(self.empty_peers))
            .row("Malformed rows skipped", fmt_num(self.malformed_rows))
            .row("Elapsed", format!("{:.1}s", self.elapsed.as_secs_f64()))
    }

    pub fn most_cited_report(&self) -> Report {
        let mut report = Report::new("Most cited");
        for (label, count) in &self.most_cited {
            report.push(truncate(label, 70), count);
        }
        report
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}

/// Build the graph from files on disk and write it to `config.output_dir`.
pub fn run(config: &Config, progress: &ProgressContext) -> anyhow::Result<GraphSummary> {
    let start = Instant::now();
    let line = progress.stage_line("graph");

    line.set_message("loading corpus");
    let records = read_records(&config.corpus_path)
        .with_context(|| format!("Cannot load corpus {}", config.corpus_path.display()))?;
    let corpus = CorpusIndex::from_records(&records);

    line.set_message("loading lookup tables");
    let citations = LinkTable::load(&config.links_dir.join(CITATIONS_FILE))?;
    let references = LinkTable::load(&config.links_dir.join(REFERENCES_FILE))?;

    line.set_message("assembling");
    let graph = assemble(&citations, &references, &corpus, config.scope);
    log::info!(
        "Graph ({} scope): {} nodes, {} edges",
        config.scope,
        fmt_num(graph.node_count()),
        fmt_num(graph.edge_count())
    );

    line.set_message("writing");
    write_all(&config.output_dir, &graph, config.write_matrix)?;
    line.finish_and_clear();

    let mut summary = GraphSummary::new(&graph, records.len());
    summary.empty_peers = citations.empty_peers + references.empty_peers;
    summary.malformed_rows = citations.malformed + references.malformed;
    summary.elapsed = start.elapsed();
    Ok(summary)
}
