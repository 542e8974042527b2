use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use std::path::Path;
use tracing::info;

use corpusrag_core::traits::EmbedProvider;
use corpusrag_core::types::{Chunk, EmbeddedChunk};

use crate::cache::EmbeddingCache;

/// Embeddings for every chunk, in chunk order.
///
/// A cache written for the same model and the same chunk count is reused as
/// is. Anything else triggers a full rebuild: all chunk texts are embedded in
/// `batch_size` batches and the cache file is rewritten. `progress` is ticked
/// once per batch; pass `ProgressBar::hidden()` when nobody is watching.
pub async fn build_embedded_index(
    chunks: &[Chunk],
    provider: &dyn EmbedProvider,
    cache_path: &Path,
    batch_size: usize,
    progress: &ProgressBar,
) -> Result<Vec<EmbeddedChunk>> {
    let model = provider.model_id();
    if let Some(cache) = EmbeddingCache::load(cache_path) {
        if cache.is_valid_for(model, chunks.len()) {
            info!(path = %cache_path.display(), chunks = cache.chunks.len(), "reusing embedding cache");
            return Ok(cache.chunks);
        }
        info!(
            cached_model = %cache.model,
            cached_chunks = cache.chunks.len(),
            model,
            chunks = chunks.len(),
            "embedding cache is stale; rebuilding"
        );
    }

    let batch_size = batch_size.max(1);
    progress.set_length(chunks.len() as u64);
    let mut embedded = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = provider
            .embed_batch(&texts)
            .await
            .with_context(|| format!("embedding chunks {}..{}", embedded.len(), embedded.len() + batch.len()))?;
        if vectors.len() != batch.len() {
            bail!("embedding provider returned {} vectors for {} inputs", vectors.len(), batch.len());
        }
        embedded.extend(
            batch.iter().cloned().zip(vectors).map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding }),
        );
        progress.inc(batch.len() as u64);
        progress.set_message(format!("{}/{} chunks", embedded.len(), chunks.len()));
    }

    let cache = EmbeddingCache::new(model, embedded);
    cache.save(cache_path)?;
    info!(path = %cache_path.display(), chunks = cache.chunks.len(), model, "embedding cache written");
    Ok(cache.chunks)
}
