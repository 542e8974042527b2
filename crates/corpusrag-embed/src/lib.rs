//! corpusrag-embed
//!
//! Clients for the remote model service (OpenAI-compatible `/embeddings` and
//! `/chat/completions`) plus a deterministic hashing embedder for tests and
//! offline runs. `APP_USE_FAKE_EMBEDDINGS=1` selects the fake.

pub mod chat;
pub mod fake;
pub mod openai;

use anyhow::Result;
use corpusrag_core::config::Settings;
use corpusrag_core::error::Error;
use corpusrag_core::traits::EmbedProvider;

pub use chat::{generate_answer, OpenAiChat};
pub use fake::FakeEmbedder;
pub use openai::OpenAiEmbedder;

pub const FAKE_EMBEDDING_DIM: usize = 256;

pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Provider selected by environment and settings.
pub fn get_default_embedder(settings: &Settings) -> Result<Box<dyn EmbedProvider>> {
    if use_fake_embeddings() {
        tracing::info!(dim = FAKE_EMBEDDING_DIM, "using fake embedder");
        return Ok(Box::new(FakeEmbedder::new(FAKE_EMBEDDING_DIM)));
    }
    let key = settings
        .api
        .resolve_key()
        .ok_or_else(|| Error::InvalidConfig("api.key is not set and OPENAI_API_KEY is missing".into()))?;
    Ok(Box::new(OpenAiEmbedder::new(&settings.api.base_url, key, &settings.embedding.model)))
}
