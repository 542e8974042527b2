//! On-disk embedding cache: one pretty-printed JSON document holding the
//! model id, a creation timestamp and every embedded chunk.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use corpusrag_core::types::EmbeddedChunk;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingCache {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub chunks: Vec<EmbeddedChunk>,
}

impl EmbeddingCache {
    pub fn new(model: impl Into<String>, chunks: Vec<EmbeddedChunk>) -> Self {
        Self { model: model.into(), created_at: Some(Utc::now()), chunks }
    }

    /// Read a cache file. Missing, unreadable or unparsable files all yield `None`.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no embedding cache");
            return None;
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "embedding cache unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "embedding cache unparsable");
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating cache directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing embedding cache {}", path.display()))?;
        Ok(())
    }

    /// Usable only for the same model and the same number of chunks.
    pub fn is_valid_for(&self, model: &str, chunk_count: usize) -> bool {
        self.model == model && self.chunks.len() == chunk_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusrag_core::types::Chunk;

    #[test]
    fn save_then_load_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("emb.json");
        let cache = EmbeddingCache::new(
            "m",
            vec![EmbeddedChunk { chunk: Chunk::new("doc", 0, "hello"), embedding: vec![0.5, -0.25] }],
        );
        cache.save(&path).unwrap();
        assert_eq!(EmbeddingCache::load(&path), Some(cache));
    }

    #[test]
    fn cache_without_timestamp_still_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emb.json");
        fs::write(&path, r#"{"model":"m","chunks":[]}"#).unwrap();
        let cache = EmbeddingCache::load(&path).unwrap();
        assert!(cache.created_at.is_none());
        assert!(cache.is_valid_for("m", 0));
        assert!(!cache.is_valid_for("other", 0));
        assert!(!cache.is_valid_for("m", 1));
    }

    #[test]
    fn garbage_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emb.json");
        fs::write(&path, "not json").unwrap();
        assert!(EmbeddingCache::load(&path).is_none());
        assert!(EmbeddingCache::load(&dir.path().join("missing.json")).is_none());
    }
}
