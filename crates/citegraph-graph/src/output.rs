//! Matrix, node attribute and edge list writers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::assemble::CitationGraph;

pub const MATRIX_FILE: &str = "citation_matrix.csv";
pub const NODES_FILE: &str = "node_attributes.csv";
pub const EDGES_FILE: &str = "edge_attributes.csv";

pub const NODE_HEADER: [&str; 10] = [
    "Id",
    "Label",
    "Author",
    "Abstract",
    "Keywords",
    "Journal",
    "Database",
    "Doi",
    "Date",
    "CitationCount",
];
pub const EDGE_HEADER: [&str; 2] = ["Source", "Target"];

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Square 0/1 matrix, pipe-delimited, rows citing and columns cited.
///
/// The header row and the first column hold node labels; the top-left cell
/// is empty. Written one row at a time.
pub fn write_matrix_to<W: Write>(writer: W, graph: &CitationGraph) -> anyhow::Result<()> {
    let n = graph.node_count();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'|')
        .from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(n + 1);
    header.push("");
    header.extend(graph.nodes.iter().map(|node| node.attributes.label.as_str()));
    wtr.write_record(&header)?;

    let mut row = vec!["0"; n];
    let mut edges = graph.edges.iter().peekable();
    for (source, node) in graph.nodes.iter().enumerate() {
        row.fill("0");
        while let Some(&(_, target)) = edges.next_if(|(s, _)| *s == source) {
            row[target] = "1";
        }
        wtr.write_field(&node.attributes.label)?;
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_nodes_to<W: Write>(writer: W, graph: &CitationGraph) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(NODE_HEADER)?;
    for (id, node) in graph.nodes.iter().enumerate() {
        let a = &node.attributes;
        let count = graph.citation_counts[id].to_string();
        let id = id.to_string();
        wtr.write_record([
            id.as_str(),
            a.label.as_str(),
            a.author.as_str(),
            a.abstract_text.as_str(),
            a.keywords.as_str(),
            a.journal.as_str(),
            a.database.as_str(),
            node.identifier.as_str(),
            a.date.as_str(),
            count.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_edges_to<W: Write>(writer: W, graph: &CitationGraph) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EDGE_HEADER)?;
    for &(source, target) in &graph.edges {
        wtr.write_record([source.to_string(), target.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the node and edge tables, plus the matrix if `with_matrix`.
pub fn write_all(dir: &Path, graph: &CitationGraph, with_matrix: bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;
    write_nodes_to(create(&dir.join(NODES_FILE))?, graph).context("Cannot write node table")?;
    write_edges_to(create(&dir.join(EDGES_FILE))?, graph).context("Cannot write edge table")?;
    if with_matrix {
        write_matrix_to(create(&dir.join(MATRIX_FILE))?, graph).context("Cannot write matrix")?;
    }
    Ok(())
}
