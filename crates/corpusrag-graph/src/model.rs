use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use corpusrag_core::error::{Error, Result};

/// Node category. Unknown tags survive as `Other` and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Work,
    Game,
    Media,
    Artist,
    Performance,
    Concept,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Work => "work",
            NodeType::Game => "game",
            NodeType::Media => "media",
            NodeType::Artist => "artist",
            NodeType::Performance => "performance",
            NodeType::Concept => "concept",
            NodeType::Other(s) => s,
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "work" => NodeType::Work,
            "game" => NodeType::Game,
            "media" => NodeType::Media,
            "artist" => NodeType::Artist,
            "performance" => NodeType::Performance,
            "concept" => NodeType::Concept,
            _ => NodeType::Other(s),
        }
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Film,
    TvEpisode,
    Other(String),
}

impl From<String> for MediaType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "film" => MediaType::Film,
            "tv_episode" => MediaType::TvEpisode,
            _ => MediaType::Other(s),
        }
    }
}

impl From<MediaType> for String {
    fn from(t: MediaType) -> Self {
        match t {
            MediaType::Film => "film".to_string(),
            MediaType::TvEpisode => "tv_episode".to_string(),
            MediaType::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

impl GraphNode {
    /// Text matched against query terms.
    ///
    /// Works use `title`, then `short_title`, then `id`. Everything else uses
    /// `name` (or `id`) followed by the description when it is non-empty.
    pub fn label(&self) -> String {
        match self.node_type {
            NodeType::Work => self
                .title
                .as_deref()
                .or(self.short_title.as_deref())
                .unwrap_or(&self.id)
                .to_string(),
            _ => {
                let name = self.name.as_deref().unwrap_or(&self.id);
                match self.description.as_deref().filter(|d| !d.is_empty()) {
                    Some(d) => format!("{name} {d}"),
                    None => name.to_string(),
                }
            }
        }
    }

    /// Document id of a work node: the file stem of `source_file`.
    pub fn doc_id(&self) -> Option<String> {
        if self.node_type != NodeType::Work {
            return None;
        }
        let source = self.source_file.as_deref()?;
        Path::new(source).file_stem().map(|s| s.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Nodes (unique by id) and edges, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    by_id: HashMap<String, usize>,
}

impl KnowledgeGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if by_id.insert(node.id.clone(), idx).is_some() {
                return Err(Error::MalformedGraph(format!("duplicate node id '{}'", node.id)));
            }
        }
        Ok(Self { nodes, edges, by_id })
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
