//! corpusrag-vector
//!
//! Brute-force cosine scoring over precomputed chunk embeddings, and the
//! JSON embedding cache the index builder reads and rewrites.

pub mod cache;
pub mod index_build;
pub mod search;

pub use cache::EmbeddingCache;
pub use index_build::build_embedded_index;
pub use search::{cosine_similarity, SemanticScorer};
