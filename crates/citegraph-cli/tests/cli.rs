//! Offline commands through the built binary

use std::path::Path;
use std::process::{Command, Output};

const WOS: &str = "Title\tAuthors\tDate\tDOI\tKeywords\tAbstract\tJournal\tPubMed ID\n\
    Paper A\tLovelace, Ada\t2020\t10.1/A\tgraphs\t\tJ1\t\n\
    Paper B\tBabbage, Charles\t2021\t10.1/b\t\t\t\t\n";

const PUBMED: &str = "Title\tAuthors\tDate\tDOI\tKeywords\tAbstract\tJournal\tPubMed ID\n\
    Paper A.\tLovelace, Ada\t2020\t10.1/a\t\tAbout A\t\t111\n\
    No DOI\tDoe, Jane\t2019\t\t\t\t\t222\n";

fn citegraph(dir: &Path, args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_citegraph"))
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("citegraph.toml"))
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "citegraph {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn setup(dir: &Path) {
    std::fs::write(dir.join("wos.tsv"), WOS).unwrap();
    std::fs::write(dir.join("pubmed.tsv"), PUBMED).unwrap();
    std::fs::write(
        dir.join("citegraph.toml"),
        "[output]\ndefault_dir = \"out\"\n\n[graph]\nwrite_matrix = true\n",
    )
    .unwrap();
}

#[test]
fn combine_dedup_graph_status() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    setup(dir);

    citegraph(
        dir,
        &["combine", "-s", "Web of Science=wos.tsv", "-s", "Pubmed=pubmed.tsv"],
    );
    let combined = std::fs::read_to_string(dir.join("out/combined/combined.tsv")).unwrap();
    assert_eq!(combined.lines().count(), 5);
    assert!(combined.contains("Ada Lovelace"));

    citegraph(dir, &["dedup"]);
    let corpus = std::fs::read_to_string(dir.join("out/corpus/corpus.tsv")).unwrap();
    let rows: Vec<&str> = corpus.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("Paper A\t"));
    assert!(rows[0].contains("About A"));
    assert!(dir.join("out/corpus/manifest.json").exists());

    // Lookup tables as a previous resolve run would have left them
    let links = dir.join("out/links");
    std::fs::create_dir_all(&links).unwrap();
    std::fs::write(
        links.join("citations.csv"),
        "Identifier,Peer Paper Internal ID,Peer DOI\n10.1/a,s2b,10.1/b\n",
    )
    .unwrap();
    std::fs::write(
        links.join("references.csv"),
        "Identifier,Peer Paper Internal ID,Peer DOI\n10.1/b,s2a,10.1/a\n10.1/b,s2x,10.9/x\n",
    )
    .unwrap();

    citegraph(dir, &["graph"]);
    let edges = std::fs::read_to_string(dir.join("out/graph/edge_attributes.csv")).unwrap();
    assert_eq!(edges, "Source,Target\n1,0\n1,2\n");
    assert!(dir.join("out/graph/citation_matrix.csv").exists());
    let nodes = std::fs::read_to_string(dir.join("out/graph/node_attributes.csv")).unwrap();
    assert!(nodes.contains("Unknown Author"));

    let status = citegraph(dir, &["status"]);
    let text = String::from_utf8_lossy(&status.stderr);
    for stage in ["combine", "dedup", "graph"] {
        assert!(text.contains(stage), "missing {stage} in status output");
    }
}

#[test]
fn graph_without_matrix() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    setup(dir);
    citegraph(dir, &["combine", "-s", "Web of Science=wos.tsv"]);
    citegraph(dir, &["dedup"]);
    let links = dir.join("out/links");
    std::fs::create_dir_all(&links).unwrap();
    for name in ["citations.csv", "references.csv"] {
        std::fs::write(links.join(name), "Identifier,Peer Paper Internal ID,Peer DOI\n").unwrap();
    }

    citegraph(dir, &["graph", "--no-matrix", "--scope", "corpus"]);
    assert!(!dir.join("out/graph/citation_matrix.csv").exists());
    let nodes = std::fs::read_to_string(dir.join("out/graph/node_attributes.csv")).unwrap();
    assert_eq!(nodes.lines().count(), 1);
}

#[test]
fn config_command_prints_settings() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    let out = citegraph(tmp.path(), &["config"]);
    let text = String::from_utf8_lossy(&out.stderr);
    assert!(text.contains("out"));
    assert!(text.contains("touched"));
}
