//! Chat-completions client for the electoral assistant.
//!
//! The [`ChatModel`] trait abstracts the LLM backend so integration tests
//! can substitute a canned implementation. [`DeepSeekChat`] talks to any
//! OpenAI-compatible chat-completions endpoint over HTTPS.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Fallback answer when the backend returns no choices.
pub const EMPTY_ANSWER_FALLBACK: &str = "No pude generar una respuesta";

/// Maximum tokens requested per completion.
const MAX_TOKENS: u32 = 1000;
/// Sampling temperature. Low, because answers must stick to the data.
const TEMPERATURE: f32 = 0.1;

/// A chat request: system instructions plus a single user message.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
}

/// Errors from the chat backend.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Request(String),
    #[error("chat response malformed: {0}")]
    Response(String),
}

/// Abstraction over the LLM backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a completion request and return the answer text.
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError>;
}

/// OpenAI-compatible chat-completions client (DeepSeek by default).
pub struct DeepSeekChat {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl DeepSeekChat {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for DeepSeekChat {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChatError::Request(format!(
                "backend returned {status}: {detail}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Response(e.to_string()))?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| EMPTY_ANSWER_FALLBACK.to_string());

        Ok(answer)
    }
}
