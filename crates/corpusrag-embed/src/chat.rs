//! OpenAI-compatible chat completions and the answer prompt.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use corpusrag_core::error::{Error, Result};
use corpusrag_core::traits::ChatProvider;
use corpusrag_core::types::RagContext;

const SERVICE: &str = "chat";

pub const SYSTEM_PROMPT: &str = "You are an assistant that answers questions about the documents in this research corpus. \
Use only the information in the provided sources. \
If the answer is not clearly supported by the sources, say you don't know.";

pub const NO_QUESTION: &str = "No question provided.";
pub const NO_CONTEXT: &str = "I don't have any relevant context to answer this question.";
pub const NO_CONTENT: &str = "[No content returned from model]";

pub struct OpenAiChat {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(base_url: &str, api_key: impl Into<String>, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.to_string(),
        }
    }
}

fn first_choice_content(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content").and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });
        debug!(model = %self.model, "requesting chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
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
        let parsed: Value = response
            .json()
            .await
            .map_err(|e| Error::provider(SERVICE, Some(status.as_u16()), format!("invalid response body: {e}")))?;
        Ok(first_choice_content(&parsed))
    }
}

pub fn user_prompt(ctx: &RagContext) -> String {
    format!("Question:\n{}\n\nSources:\n{}", ctx.query, ctx.context_text)
}

/// Answer `ctx.query` from `ctx.context_text` only. The service is not called
/// when either is blank.
pub async fn generate_answer(chat: &dyn ChatProvider, ctx: &RagContext) -> Result<String> {
    if ctx.query.trim().is_empty() {
        return Ok(NO_QUESTION.to_string());
    }
    if ctx.context_text.trim().is_empty() {
        return Ok(NO_CONTEXT.to_string());
    }
    let answer = chat.complete(SYSTEM_PROMPT, &user_prompt(ctx)).await?;
    Ok(answer.unwrap_or_else(|| NO_CONTENT.to_string()))
}
