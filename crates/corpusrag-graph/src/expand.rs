//! Query-to-graph matching and one-hop expansion.
//!
//! Edges are stored directed but walked both ways: the adjacency built in
//! [`GraphExpander::new`] lists every edge under both endpoints, in edge-list
//! order. Expansion is a single hop from the seed set; neighbours of
//! neighbours are never added.

use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

use corpusrag_core::query::{tokenize_query, TokenizeOptions};

use crate::model::{GraphNode, KnowledgeGraph};

pub const DEFAULT_SEED_LIMIT: usize = 5;

/// A node matched directly by the query, scored by how many query terms its
/// label contains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedMatch<'g> {
    pub node: &'g GraphNode,
    pub score: usize,
}

#[derive(Debug, Clone, Default)]
pub struct GraphExpansion<'g> {
    pub seeds: Vec<&'g GraphNode>,
    /// Seeds followed by their one-hop neighbours, without duplicates.
    pub nodes: Vec<&'g GraphNode>,
    pub target_doc_ids: BTreeSet<String>,
}

pub struct GraphExpander {
    graph: KnowledgeGraph,
    labels: Vec<String>,
    adjacency: Vec<Vec<usize>>,
    seed_limit: usize,
}

impl GraphExpander {
    pub fn new(graph: KnowledgeGraph) -> Self {
        let labels = graph.nodes().iter().map(|n| n.label().to_lowercase()).collect();
        let mut adjacency = vec![Vec::new(); graph.nodes().len()];
        for edge in graph.edges() {
            match (graph.position(&edge.source), graph.position(&edge.target)) {
                (Some(s), Some(t)) => {
                    adjacency[s].push(t);
                    adjacency[t].push(s);
                }
                _ => warn!(source = %edge.source, target = %edge.target, "edge references unknown node; skipped"),
            }
        }
        Self { graph, labels, adjacency, seed_limit: DEFAULT_SEED_LIMIT }
    }

    pub fn with_seed_limit(mut self, limit: usize) -> Self {
        self.seed_limit = limit;
        self
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    /// Up to `seed_limit` nodes whose label contains at least one query term,
    /// best first; ties keep graph order. Stopwords are kept because entity
    /// names may consist of them.
    pub fn match_seeds(&self, query: &str) -> Vec<SeedMatch<'_>> {
        let terms = tokenize_query(query, TokenizeOptions::entity());
        if terms.is_empty() {
            return Vec::new();
        }
        let mut matches: Vec<SeedMatch<'_>> = self
            .graph
            .nodes()
            .iter()
            .zip(&self.labels)
            .filter_map(|(node, label)| {
                let score = terms.iter().filter(|t| label.contains(t.as_str())).count();
                (score > 0).then_some(SeedMatch { node, score })
            })
            .collect();
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(self.seed_limit);
        matches
    }

    /// `selected` plus every node sharing an edge with one of them.
    pub fn expand_neighbors<'a>(&'a self, selected: &[&'a GraphNode]) -> Vec<&'a GraphNode> {
        let mut seen: HashSet<&str> = selected.iter().map(|n| n.id.as_str()).collect();
        let mut out: Vec<&GraphNode> = selected.to_vec();
        for node in selected {
            let Some(pos) = self.graph.position(&node.id) else {
                continue;
            };
            for &neighbor in &self.adjacency[pos] {
                let n = &self.graph.nodes()[neighbor];
                if seen.insert(n.id.as_str()) {
                    out.push(n);
                }
            }
        }
        out
    }

    pub fn expand(&self, query: &str) -> GraphExpansion<'_> {
        let seeds: Vec<&GraphNode> = self.match_seeds(query).into_iter().map(|m| m.node).collect();
        if seeds.is_empty() {
            debug!("no graph nodes matched the query");
            return GraphExpansion::default();
        }
        debug!(seeds = ?seeds.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), "matched graph nodes");

        let nodes = self.expand_neighbors(&seeds);
        debug!(
            neighbors = ?nodes[seeds.len()..].iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            "one-hop neighbours"
        );
        let target_doc_ids = target_doc_ids(&nodes);
        GraphExpansion { seeds, nodes, target_doc_ids }
    }
}

/// Document ids of the work nodes among `nodes` that name a source file.
pub fn target_doc_ids(nodes: &[&GraphNode]) -> BTreeSet<String> {
    nodes.iter().filter_map(|n| n.doc_id()).collect()
}
