//! LLM Providers
//!
//! Defines the chat and embedding traits the extraction router calls, and an
//! OpenAI-compatible HTTP implementation of both.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{
    ChatMessage, ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse, ProviderError,
};

/// Maximum inputs sent in one embeddings request
const EMBEDDING_BATCH_SIZE: usize = 256;

/// Chat completion trait
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one user prompt and return the completion text
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Embedding trait
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embed each input; the result has one vector per input, in order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

    /// Embed a single query string
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, ProviderError> {
        let mut vectors = self.embed(&[query.to_string()]).await?;
        if vectors.len() != 1 {
            return Err(ProviderError::MalformedResponse(format!(
                "expected 1 query embedding, got {}",
                vectors.len()
            )));
        }
        Ok(vectors.remove(0))
    }
}

/// OpenAI-compatible API client (OpenAI, Azure-style proxies, local gateways)
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        chat_model: &str,
        embedding_model: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            chat_model: chat_model.to_string(),
            embedding_model: embedding_model.to_string(),
            temperature,
        })
    }

    pub fn from_config(config: &crate::config::LlmConfig) -> Result<Self, ProviderError> {
        Self::new(
            &config.base_url,
            &config.api_key,
            &config.model_name,
            &config.embedding_model,
            config.temperature,
            config.timeout(),
        )
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ProviderError>
    where
        Req: serde::Serialize + ?Sized,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: inputs,
        };
        let response: EmbeddingResponse = self.post("/embeddings", &request).await?;

        if response.data.len() != inputs.len() {
            return Err(ProviderError::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        if let Some((position, d)) = data.iter().enumerate().find(|(i, d)| d.index != *i) {
            return Err(ProviderError::MalformedResponse(format!(
                "embedding index {} found at position {}",
                d.index, position
            )));
        }
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.chat_model,
            temperature: self.temperature,
            messages: vec![ChatMessage::user(prompt)],
        };

        let response: ChatResponse = self.post("/chat/completions", &request).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::MalformedResponse("no choices in response".into()))?;

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(text)
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiClient {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut vectors = Vec::with_capacity(inputs.len());
        for batch in inputs.chunks(EMBEDDING_BATCH_SIZE) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}
