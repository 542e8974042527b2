use corpusrag_core::error::{Error, Result};
use corpusrag_core::types::{EmbeddedChunk, ScoredChunk};

/// `dot(a, b) / (|a| * |b|)`, accumulated in f64 and clamped to `[-1, 1]`.
///
/// Lengths must agree; a zero-norm side scores 0 instead of failing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch { expected: a.len(), actual: b.len() });
    }
    let (mut dot, mut norm_a, mut norm_b) = (0f64, 0f64, 0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Linear scan over every embedded chunk. No index structure; corpora are small.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticScorer;

impl SemanticScorer {
    pub fn new() -> Self {
        Self
    }

    /// Ranked by similarity, highest first, equal scores in corpus order.
    /// Any chunk whose embedding length differs from the query's fails the
    /// whole call with `DimensionMismatch`.
    pub fn score<'a, I>(&self, chunks: I, query: &[f32], max_results: usize) -> Result<Vec<ScoredChunk>>
    where
        I: IntoIterator<Item = &'a EmbeddedChunk>,
    {
        let mut scored = chunks
            .into_iter()
            .map(|ec| {
                let score = cosine_similarity(&ec.embedding, query)?;
                Ok(ScoredChunk { chunk: ec.chunk.clone(), score })
            })
            .collect::<Result<Vec<_>>>()?;
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(max_results);
        Ok(scored)
    }
}
