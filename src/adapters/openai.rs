//! OpenAI-compatible HTTP adapters for the embedding and completion ports.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ClauseError, Result};
use crate::ports::{Completion, CompletionClient, EmbeddingGenerator};

pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbeddings {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.openai_base_url().trim_end_matches('/').to_string(),
            api_key: config.require_openai_api_key()?.to_string(),
            model: config.embedding.model.clone(),
            dimension: config.embedding.dimension,
        })
    }

    async fn request(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct Response {
            data: Vec<EmbeddingItem>,
        }

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&Request {
                model: &self.model,
                input,
            })
            .send()
            .await
            .map_err(|e| ClauseError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClauseError::Embedding(format!(
                "embedding request failed ({status}): {}",
                error_message(&body)
            )));
        }

        let body: Response = response
            .json()
            .await
            .map_err(|e| ClauseError::Embedding(e.to_string()))?;

        if body.data.len() != input.len() {
            return Err(ClauseError::Embedding(format!(
                "service returned {} embeddings for {} inputs",
                body.data.len(),
                input.len()
            )));
        }

        Ok(vectors_in_input_order(body.data))
    }
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

/// The service tags each item with its input index; sort so output position
/// `i` always corresponds to input position `i`.
fn vectors_in_input_order(mut data: Vec<EmbeddingItem>) -> Vec<Vec<f32>> {
    data.sort_by_key(|item| item.index);
    data.into_iter().map(|item| item.embedding).collect()
}

#[async_trait]
impl EmbeddingGenerator for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        let mut vectors = self.request(&input).await?;
        vectors
            .pop()
            .ok_or_else(|| ClauseError::Embedding("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

pub struct OpenAiCompletions {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletions {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.openai_base_url().trim_end_matches('/').to_string(),
            api_key: config.require_openai_api_key()?.to_string(),
            model: config.generation.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletions {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<Completion> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
            usage: Option<Usage>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: String,
        }

        #[derive(Deserialize)]
        struct Usage {
            total_tokens: u32,
        }

        let request = Request {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            // Pinned to zero: identical inputs must yield reproducible outputs.
            temperature: 0.0,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClauseError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClauseError::Generation(format!(
                "completion request failed ({status}): {}",
                error_message(&body)
            )));
        }

        let body: Response = response
            .json()
            .await
            .map_err(|e| ClauseError::Generation(e.to_string()))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ClauseError::Generation("empty completion response".to_string()))?;

        Ok(Completion {
            text,
            total_tokens: body.usage.map_or(0, |u| u.total_tokens),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Pulls the `error.message` field out of an OpenAI-style error body, falling
/// back to the raw body text.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: ErrorBody,
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| body.to_string(), |e| e.error.message)
}
