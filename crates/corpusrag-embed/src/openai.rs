//! OpenAI-compatible embeddings client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use corpusrag_core::error::{Error, Result};
use corpusrag_core::traits::EmbedProvider;

const SERVICE: &str = "embeddings";
const EMPTY_PLACEHOLDER: &str = "(empty)";

pub struct OpenAiEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingData {
    #[serde(default)]
    pub index: Option<usize>,
    pub embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(base_url: &str, api_key: impl Into<String>, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

/// Strip NULs and substitute a placeholder for blank strings; the service
/// rejects empty inputs.
pub(crate) fn sanitize_inputs(texts: &[String]) -> Vec<String> {
    texts
        .iter()
        .enumerate()
        .map(|(idx, t)| {
            let cleaned = t.replace('\u{0}', "");
            let trimmed = cleaned.trim();
            if trimmed.is_empty() {
                warn!(index = idx, "empty embedding input; substituting placeholder");
                EMPTY_PLACEHOLDER.to_string()
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

/// Order vectors by the reported `index` and check one vector per input.
pub(crate) fn into_ordered_vectors(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(Error::provider(
            SERVICE,
            None,
            format!("expected {expected} embeddings, got {}", data.len()),
        ));
    }
    if data.iter().all(|d| d.index.is_some()) {
        data.sort_by_key(|d| d.index);
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl EmbedProvider for OpenAiEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = EmbeddingRequest { model: &self.model, input: sanitize_inputs(texts) };
        debug!(model = %self.model, inputs = texts.len(), "requesting embeddings");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(SERVICE, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::provider(
                SERVICE,
                Some(status.as_u16()),
                format!("{} - {}", status.canonical_reason().unwrap_or(""), text),
            ));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(SERVICE, Some(status.as_u16()), format!("invalid response body: {e}")))?;
        into_ordered_vectors(parsed, texts.len())
    }
}
