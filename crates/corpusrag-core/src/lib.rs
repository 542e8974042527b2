//! corpusrag-core
//!
//! Domain types, error taxonomy, configuration, the shared query tokenizer,
//! corpus chunking and context assembly used by every retrieval strategy.

pub mod config;
pub mod context;
pub mod data_processor;
pub mod error;
pub mod query;
pub mod traits;
pub mod types;

pub use context::assemble_context;
pub use error::{Error, Result};
pub use types::{Chunk, Document, EmbeddedChunk, RagContext, ScoredChunk};
