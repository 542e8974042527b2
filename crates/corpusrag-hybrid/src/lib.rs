//! corpusrag-hybrid
//!
//! The three retrieval pipelines behind one engine:
//! - keyword: TF-IDF over chunk text
//! - embedding: cosine scan against the query embedding
//! - graph: embedding search restricted to documents reached through the
//!   knowledge graph, balanced across those documents

pub mod balance;
pub mod pipeline;

pub use balance::{balance, per_doc_limit};
pub use pipeline::{GraphRagContext, RetrievalEngine, RetrievalMode};
