use async_trait::async_trait;

use crate::error::{Error, Result};

/// Remote or local embedding model.
#[async_trait]
pub trait EmbedProvider: Send + Sync {
    /// Stable identifier of the embedding model; embedding caches are keyed by it.
    fn model_id(&self) -> &str;

    /// Embed a batch of texts. Output order matches input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::provider(self.model_id(), None, "empty embedding response"))
    }
}

/// Chat-completion model used for answer generation.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn model_id(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>>;
}
