//! Structured generation client.
//!
//! One trait, two implementations: `OpenAiClient` talks to an
//! OpenAI-compatible chat-completions endpoint (structured output via
//! `response_format: json_schema`, chat via SSE streaming), `MockGenerationClient`
//! returns preconfigured values for tests. Retry policy: none — a failed
//! call surfaces the error to the caller.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use shared_types::{ChatMessage, ChatRole};

use crate::config::GenerationConfig;

/// Errors from generation and vision provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("provider returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("schema validation failed: {0}")]
    Schema(String),
}

/// Token-by-token chat output.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// Client contract for the generation provider.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Single-shot structured generation: send `prompt` with a declared
    /// output schema, get back a value conforming to it.
    async fn generate_object(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Open a streaming chat completion for `messages`.
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChatStream, ProviderError>;
}

/// Production client for an OpenAI-compatible endpoint.
pub struct OpenAiClient {
    config: GenerationConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn role_str(role: ChatRole) -> &'static str {
        match role {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    fn messages_json(messages: &[ChatMessage]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": Self::role_str(m.role),
                    "content": m.content,
                })
            })
            .collect()
    }

    async fn post(&self, body: serde_json::Value) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 429 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::RateLimited(message));
        }
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http { status, message });
        }
        Ok(response)
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate_object(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "structured_output",
                    "strict": true,
                    "schema": schema,
                }
            }
        });

        let response = self.post(body).await?;
        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Schema(format!("failed to parse response: {e}")))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .ok_or_else(|| ProviderError::Schema("response carried no content".to_string()))?;

        serde_json::from_str(content)
            .map_err(|e| ProviderError::Schema(format!("content is not valid JSON: {e}")))
    }

    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChatStream, ProviderError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": 0.7,
            "stream": true,
            "messages": Self::messages_json(&messages),
        });

        let response = self.post(body).await?;

        let (tx, rx) = mpsc::channel::<Result<String, ProviderError>>(32);
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(Err(ProviderError::Network(e.to_string()))).await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // Process complete SSE lines
                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    let Some(data) = line.strip_prefix("data:").map(str::trim) else {
                        continue;
                    };
                    if data == "[DONE]" {
                        return;
                    }

                    match serde_json::from_str::<StreamChunk>(data) {
                        Ok(parsed) => {
                            let delta = parsed
                                .choices
                                .first()
                                .and_then(|c| c.delta.as_ref())
                                .and_then(|d| d.content.clone());
                            if let Some(delta) = delta {
                                if tx.send(Ok(delta)).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            debug!("skipping unparseable SSE line: {e}");
                        }
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Mock client for tests — preconfigured object and chat chunks.
#[derive(Default)]
pub struct MockGenerationClient {
    object: Option<serde_json::Value>,
    chunks: Vec<String>,
    fail: bool,
}

impl MockGenerationClient {
    pub fn with_object(object: serde_json::Value) -> Self {
        Self {
            object: Some(object),
            ..Default::default()
        }
    }

    pub fn with_chunks(chunks: Vec<&str>) -> Self {
        Self {
            chunks: chunks.into_iter().map(String::from).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate_object(
        &self,
        _prompt: &str,
        _schema: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        if self.fail {
            return Err(ProviderError::Network("mock provider failure".to_string()));
        }
        Ok(self.object.clone().unwrap_or(serde_json::Value::Null))
    }

    async fn stream_chat(&self, _messages: Vec<ChatMessage>) -> Result<ChatStream, ProviderError> {
        if self.fail {
            return Err(ProviderError::Network("mock provider failure".to_string()));
        }
        let chunks: Vec<Result<String, ProviderError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_configured_object() {
        let client = MockGenerationClient::with_object(serde_json::json!({"topic": "冬天"}));
        let value = client
            .generate_object("prompt", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(value["topic"], "冬天");
    }

    #[tokio::test]
    async fn mock_failure_surfaces_error() {
        let client = MockGenerationClient::failing();
        let result = client.generate_object("prompt", serde_json::json!({})).await;
        assert!(matches!(result, Err(ProviderError::Network(_))));
    }

    #[tokio::test]
    async fn mock_streams_chunks_in_order() {
        let client = MockGenerationClient::with_chunks(vec!["你", "好"]);
        let mut stream = client.stream_chat(vec![]).await.unwrap();

        let mut collected = String::new();
        while let Some(chunk) = stream.next().await {
            collected.push_str(&chunk.unwrap());
        }
        assert_eq!(collected, "你好");
    }

    #[test]
    fn stream_chunk_parses_delta() {
        let data = r#"{"choices":[{"delta":{"content":"秋"}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(data).unwrap();
        assert_eq!(
            chunk.choices[0].delta.as_ref().unwrap().content.as_deref(),
            Some("秋")
        );
    }
}
