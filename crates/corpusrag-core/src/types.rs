//! Domain types shared by the scorers, the graph expander and the pipelines.

use serde::{Deserialize, Serialize};

/// A source document as read from the corpus directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub content: String,
}

/// A bounded slice of a document, the unit of retrieval.
///
/// - `doc_id`: file stem of the source document
/// - `chunk_index`: position within the document, sequential from 0
/// - `text`: trimmed payload, at most `max_chars_per_chunk` characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    pub doc_id: String,
    pub chunk_index: usize,
    pub text: String,
}

impl Chunk {
    pub fn new(doc_id: impl Into<String>, chunk_index: usize, text: impl Into<String>) -> Self {
        Self { doc_id: doc_id.into(), chunk_index, text: text.into() }
    }

    /// Identity of a chunk across the corpus: `(doc_id, chunk_index)`.
    pub fn key(&self) -> (&str, usize) {
        (self.doc_id.as_str(), self.chunk_index)
    }
}

/// A chunk paired with its precomputed embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A chunk with a strategy-specific relevance score. Higher is better;
/// scores from different strategies are not comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f64,
}

/// The retrieval result handed to answer generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagContext {
    pub query: String,
    pub results: Vec<ScoredChunk>,
    pub context_text: String,
}

impl RagContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
