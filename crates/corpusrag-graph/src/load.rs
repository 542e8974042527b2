use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use corpusrag_core::error::Error;

use crate::model::{GraphEdge, GraphNode, KnowledgeGraph};

/// Read the node and edge files concurrently and build the graph.
pub async fn load_knowledge_graph(nodes_path: &Path, edges_path: &Path) -> Result<KnowledgeGraph> {
    let (nodes_raw, edges_raw) = futures::try_join!(
        async { tokio::fs::read_to_string(nodes_path).await.with_context(|| format!("reading {}", nodes_path.display())) },
        async { tokio::fs::read_to_string(edges_path).await.with_context(|| format!("reading {}", edges_path.display())) },
    )?;
    let nodes: Value = serde_json::from_str(&nodes_raw).with_context(|| format!("parsing {}", nodes_path.display()))?;
    let edges: Value = serde_json::from_str(&edges_raw).with_context(|| format!("parsing {}", edges_path.display()))?;
    let graph = parse_knowledge_graph(nodes, edges)?;
    info!(nodes = graph.nodes().len(), edges = graph.edges().len(), "knowledge graph loaded");
    Ok(graph)
}

/// Both values must be JSON arrays of node/edge objects.
pub fn parse_knowledge_graph(nodes: Value, edges: Value) -> corpusrag_core::Result<KnowledgeGraph> {
    let nodes: Vec<GraphNode> = parse_array(nodes, "nodes")?;
    let edges: Vec<GraphEdge> = parse_array(edges, "edges")?;
    KnowledgeGraph::new(nodes, edges)
}

fn parse_array<T: DeserializeOwned>(value: Value, what: &str) -> corpusrag_core::Result<Vec<T>> {
    if !value.is_array() {
        return Err(Error::MalformedGraph(format!("{what} must be a JSON array")));
    }
    serde_json::from_value(value).map_err(|e| Error::MalformedGraph(format!("invalid {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_array_inputs_are_malformed() {
        let err = parse_knowledge_graph(json!({"nodes": []}), json!([])).unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(ref m) if m.contains("nodes")));
        let err = parse_knowledge_graph(json!([]), json!("edges")).unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(ref m) if m.contains("edges")));
    }

    #[test]
    fn entries_missing_required_fields_are_malformed() {
        let err = parse_knowledge_graph(json!([{"type": "work"}]), json!([])).unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
    }

    #[test]
    fn empty_arrays_make_an_empty_graph() {
        assert!(parse_knowledge_graph(json!([]), json!([])).unwrap().is_empty());
    }
}
