//! corpusrag-graph
//!
//! Knowledge graph of works, games, artists and related entities, loaded from
//! two JSON arrays (nodes, edges), and the one-hop query expansion that maps a
//! query to the documents structurally connected to the entities it names.

pub mod expand;
pub mod load;
pub mod model;

pub use expand::{GraphExpander, GraphExpansion, SeedMatch, DEFAULT_SEED_LIMIT};
pub use load::{load_knowledge_graph, parse_knowledge_graph};
pub use model::{GraphEdge, GraphNode, KnowledgeGraph, MediaType, NodeType};
