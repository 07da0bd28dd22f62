//! Graph assembly from citation and reference tables

use rustc_hash::{FxHashMap, FxHashSet};

use crate::index::{CorpusIndex, NodeAttributes};
use crate::links::LinkTable;

/// Which identifiers become nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeScope {
    /// Every identifier seen as a key or peer in either table
    #[default]
    Touched,
    /// Only identifiers with a corpus record; edges to other works are dropped
    Corpus,
}

impl NodeScope {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "touched" => Some(Self::Touched),
            "corpus" => Some(Self::Corpus),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Touched => "touched",
            Self::Corpus => "corpus",
        }
    }
}

impl std::fmt::Display for NodeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub identifier: String,
    pub attributes: NodeAttributes,
    /// Whether the metadata came from the corpus
    pub in_corpus: bool,
}

/// Directed citation graph. Edge `(s, t)` means node `s` cites node `t`.
#[derive(Debug, Clone, Default)]
pub struct CitationGraph {
    pub nodes: Vec<Node>,
    /// Sorted by (source, target), no duplicates
    pub edges: Vec<(usize, usize)>,
    /// In-degree per node
    pub citation_counts: Vec<usize>,
    index: FxHashMap<String, usize>,
}

impl CitationGraph {
    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.index.get(identifier).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn placeholder_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.in_corpus).count()
    }

    /// Up to `n` nodes by descending citation count, earlier index first on ties.
    pub fn most_cited(&self, n: usize) -> Vec<(&Node, usize)> {
        let mut order: Vec<usize> = (0..self.nodes.len()).collect();
        order.sort_by(|&a, &b| {
            self.citation_counts[b]
                .cmp(&self.citation_counts[a])
                .then(a.cmp(&b))
        });
        order
            .into_iter()
            .take(n)
            .map(|i| (&self.nodes[i], self.citation_counts[i]))
            .collect()
    }
}

/// Assigns node indices in first-encounter order.
struct NodeInterner<'a> {
    corpus: &'a CorpusIndex,
    scope: NodeScope,
    index: FxHashMap<String, usize>,
    order: Vec<String>,
}

impl NodeInterner<'_> {
    /// Index for `id`, assigning one if the scope admits it.
    fn intern(&mut self, id: &str) -> Option<usize> {
        if let Some(&i) = self.index.get(id) {
            return Some(i);
        }
        if self.scope == NodeScope::Corpus && !self.corpus.contains(id) {
            return None;
        }
        let i = self.order.len();
        self.order.push(id.to_string());
        self.index.insert(id.to_string(), i);
        Some(i)
    }
}

/// Build the graph. `citations` maps a work to the works citing it,
/// `references` maps a work to the works it cites.
pub fn assemble(
    citations: &LinkTable,
    references: &LinkTable,
    corpus: &CorpusIndex,
    scope: NodeScope,
) -> CitationGraph {
    let mut nodes = NodeInterner {
        corpus,
        scope,
        index: FxHashMap::default(),
        order: Vec::new(),
    };
    let mut edges: FxHashSet<(usize, usize)> = FxHashSet::default();

    for (cited, citing_peers) in citations.iter() {
        let cited = nodes.intern(cited);
        for citing in citing_peers {
            let citing = nodes.intern(citing);
            if let (Some(s), Some(t)) = (citing, cited) {
                edges.insert((s, t));
            }
        }
    }
    for (citing, cited_peers) in references.iter() {
        let citing = nodes.intern(citing);
        for cited in cited_peers {
            let cited = nodes.intern(cited);
            if let (Some(s), Some(t)) = (citing, cited) {
                edges.insert((s, t));
            }
        }
    }

    let mut edges: Vec<(usize, usize)> = edges.into_iter().collect();
    edges.sort_unstable();

    let mut citation_counts = vec![0usize; nodes.order.len()];
    for &(_, target) in &edges {
        citation_counts[target] += 1;
    }

    let graph_nodes = nodes
        .order
        .into_iter()
        .map(|identifier| match corpus.get(&identifier) {
            Some(attrs) => Node {
                attributes: attrs.clone(),
                identifier,
                in_corpus: true,
            },
            None => Node {
                attributes: NodeAttributes::placeholder(&identifier),
                identifier,
                in_corpus: false,
            },
        })
        .collect();

    CitationGraph {
        nodes: graph_nodes,
        edges,
        citation_counts,
        index: nodes.index,
    }
}

#[cfg(test)]
mod tests {
    use citegraph_corpus::{Field, Record};

    use super::*;

    fn table(pairs: &[(&str, &str)]) -> LinkTable {
        pairs.iter().copied().collect()
    }

    fn corpus(ids: &[&str]) -> CorpusIndex {
        let records: Vec<Record> = ids
            .iter()
            .map(|id| {
                Record::default()
                    .with(Field::Title, format!("Title {id}"))
                    .with(Field::Doi, *id)
            })
            .collect();
        CorpusIndex::from_records(&records)
    }

    #[test]
    fn both_directions_yield_one_edge() {
        let graph = assemble(
            &table(&[("a", "b")]),
            &table(&[("b", "a")]),
            &corpus(&["a", "b"]),
            NodeScope::Touched,
        );
        let a = graph.index_of("a").unwrap();
        let b = graph.index_of("b").unwrap();
        assert_eq!(graph.edges, vec![(b, a)]);
        assert_eq!(graph.citation_counts[a], 1);
        assert_eq!(graph.citation_counts[b], 0);
    }

    #[test]
    fn first_encounter_indices() {
        let graph = assemble(
            &table(&[("a", "b"), ("c", "d")]),
            &table(&[("e", "a")]),
            &CorpusIndex::default(),
            NodeScope::Touched,
        );
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.identifier.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn peer_only_node_gets_placeholder() {
        let graph = assemble(
            &table(&[]),
            &table(&[("a", "c")]),
            &corpus(&["a"]),
            NodeScope::Touched,
        );
        let c = graph.index_of("c").unwrap();
        let node = &graph.nodes[c];
        assert!(!node.in_corpus);
        assert_eq!(node.attributes.label, "c");
        assert_eq!(node.attributes.author, "Unknown Author");
        assert_eq!(graph.citation_counts[c], 1);
        assert_eq!(graph.placeholder_count(), 1);
        assert_eq!(graph.nodes[graph.index_of("a").unwrap()].attributes.label, "Title a");
    }

    #[test]
    fn citing_peer_only_node_gets_placeholder() {
        // c appears only as a peer in the citations table: it cites a
        let graph = assemble(
            &table(&[("a", "c")]),
            &table(&[]),
            &corpus(&["a"]),
            NodeScope::Touched,
        );
        let a = graph.index_of("a").unwrap();
        let c = graph.index_of("c").unwrap();
        let node = &graph.nodes[c];
        assert!(!node.in_corpus);
        assert_eq!(node.attributes, NodeAttributes::placeholder("c"));
        assert_eq!(node.attributes.date, "Unknown Date");
        assert_eq!(graph.edges, vec![(c, a)]);
        assert_eq!(graph.citation_counts[c], 0);
        assert_eq!(graph.citation_counts[a], 1);
    }

    #[test]
    fn corpus_scope_drops_outside_works() {
        let graph = assemble(
            &table(&[("a", "x")]),
            &table(&[("a", "b"), ("a", "y")]),
            &corpus(&["a", "b"]),
            NodeScope::Corpus,
        );
        assert_eq!(graph.node_count(), 2);
        assert!(graph.index_of("x").is_none());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn self_edges_kept() {
        let graph = assemble(
            &table(&[("a", "a")]),
            &table(&[]),
            &CorpusIndex::default(),
            NodeScope::Touched,
        );
        assert_eq!(graph.edges, vec![(0, 0)]);
        assert_eq!(graph.citation_counts, vec![1]);
    }

    #[test]
    fn edges_valid_and_counts_match() {
        let graph = assemble(
            &table(&[("a", "b"), ("a", "c"), ("b", "c"), ("a", "b")]),
            &table(&[("c", "d"), ("d", "a"), ("b", "a")]),
            &corpus(&["a", "b"]),
            NodeScope::Touched,
        );
        let n = graph.node_count();
        let mut counts = vec![0; n];
        for &(s, t) in &graph.edges {
            assert!(s < n && t < n);
            counts[t] += 1;
        }
        assert_eq!(counts, graph.citation_counts);
        assert!(graph.edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn most_cited_ordering() {
        let graph = assemble(
            &table(&[("a", "b"), ("a", "c"), ("c", "b")]),
            &table(&[]),
            &CorpusIndex::default(),
            NodeScope::Touched,
        );
        let top: Vec<(&str, usize)> = graph
            .most_cited(2)
            .into_iter()
            .map(|(n, c)| (n.identifier.as_str(), c))
            .collect();
        assert_eq!(top, [("a", 2), ("c", 1)]);
    }

    #[test]
    fn scope_names() {
        assert_eq!(NodeScope::from_name("corpus"), Some(NodeScope::Corpus));
        assert_eq!(NodeScope::from_name("all"), None);
        assert_eq!(NodeScope::default().to_string(), "touched");
    }
}
