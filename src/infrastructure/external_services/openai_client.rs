use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::application::ports::chat_completion::{
    ChatCompletionError, ChatCompletionProvider, ChatCompletionRequest, ChatCompletionResponse,
};
use crate::application::ports::embedding_provider::{
    EmbeddingBatch, EmbeddingProvider, EmbeddingProviderError,
};
use crate::config::AppConfig;
use crate::domain::value_objects::ChatMessage;

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<i32>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    model: String,
    choices: Vec<CompletionChoice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub max_retries: u32,
    pub timeout_secs: Option<u64>,
    pub backoff_factor: f64,
}

impl OpenAiClientConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            embedding_model: config.embedding_model.clone(),
            max_retries: config.provider_max_retries,
            timeout_secs: config.provider_timeout_secs,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug)]
pub enum OpenAiError {
    RequestError(String),
    ApiError { status: u16, message: String },
    ParseError(String),
}

impl OpenAiError {
    fn is_retryable(&self) -> bool {
        match self {
            OpenAiError::RequestError(_) => true,
            OpenAiError::ApiError { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            OpenAiError::ParseError(_) => false,
        }
    }
}

impl std::fmt::Display for OpenAiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenAiError::RequestError(msg) => write!(f, "Request error: {}", msg),
            OpenAiError::ApiError { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            OpenAiError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

/// Thin client for an OpenAI-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, ReqwestError> {
        let mut builder = Client::builder();
        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }

    async fn create_embeddings(&self, texts: &[String]) -> Result<EmbeddingsResponse, OpenAiError> {
        let request = EmbeddingsRequest {
            model: &self.config.embedding_model,
            input: texts,
        };

        self.send_request("embeddings", &request).await
    }

    async fn create_chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<CompletionResponse, OpenAiError> {
        let request = CompletionRequest {
            model,
            messages,
            stream: false,
        };

        self.send_request("chat/completions", &request).await
    }

    async fn send_request<B, R>(&self, path: &str, body: &B) -> Result<R, OpenAiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(path, body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempts <= self.config.max_retries => {
                    let backoff_time = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    tracing::warn!(
                        "Provider call to /{} failed (attempt {}): {}; retrying in {} ms",
                        path,
                        attempts,
                        e,
                        backoff_time.as_millis()
                    );
                    tokio::time::sleep(backoff_time).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute_request<B, R>(&self, path: &str, body: &B) -> Result<R, OpenAiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.config.base_url, path))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| OpenAiError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OpenAiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| OpenAiError::ParseError(e.to_string()))
    }
}

fn into_ordered_embeddings(mut data: Vec<EmbeddingData>) -> Vec<Vec<f32>> {
    data.sort_by_key(|d| d.index);
    data.into_iter().map(|d| d.embedding).collect()
}

pub struct OpenAiEmbeddingProvider {
    client: OpenAiClient,
    batch_size: usize,
}

impl OpenAiEmbeddingProvider {
    pub fn new(client: OpenAiClient) -> Self {
        Self {
            client,
            batch_size: 100,
        }
    }
}

impl From<OpenAiError> for EmbeddingProviderError {
    fn from(error: OpenAiError) -> Self {
        match error {
            OpenAiError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
            OpenAiError::ApiError { status: 429, .. } => EmbeddingProviderError::RateLimitExceeded,
            OpenAiError::ApiError { status, .. } if status >= 500 => {
                EmbeddingProviderError::ServiceUnavailable
            }
            OpenAiError::ApiError { status, message } => {
                EmbeddingProviderError::ApiError(format!("{}: {}", status, message))
            }
            OpenAiError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch, EmbeddingProviderError> {
        if texts.len() > self.batch_size {
            return Err(EmbeddingProviderError::InvalidInput(format!(
                "Batch of {} texts exceeds limit of {}",
                texts.len(),
                self.batch_size
            )));
        }

        let response = self.client.create_embeddings(texts).await?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        Ok(EmbeddingBatch {
            embeddings: into_ordered_embeddings(response.data),
            model_name: response.model,
            total_tokens: response.usage.and_then(|u| u.total_tokens),
        })
    }

    fn model_info(&self) -> String {
        self.client.embedding_model().to_string()
    }

    fn max_batch_size(&self) -> usize {
        self.batch_size
    }
}

pub struct OpenAiChatProvider {
    client: OpenAiClient,
}

impl OpenAiChatProvider {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

impl From<OpenAiError> for ChatCompletionError {
    fn from(error: OpenAiError) -> Self {
        match error {
            OpenAiError::RequestError(msg) => ChatCompletionError::NetworkError(msg),
            OpenAiError::ApiError { status: 429, .. } => ChatCompletionError::RateLimitExceeded,
            OpenAiError::ApiError { status, message } => {
                ChatCompletionError::ApiError { status, message }
            }
            OpenAiError::ParseError(msg) => ChatCompletionError::ApiError {
                status: 200,
                message: msg,
            },
        }
    }
}

#[async_trait]
impl ChatCompletionProvider for OpenAiChatProvider {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatCompletionError> {
        let response = self
            .client
            .create_chat_completion(request.model.as_str(), &request.messages)
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatCompletionError::EmptyResponse)?;

        Ok(ChatCompletionResponse {
            content,
            model: response.model,
            total_tokens: response.usage.and_then(|u| u.total_tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_shape() {
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        let request = CompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            stream: false,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][2]["role"], "assistant");
        assert_eq!(json["messages"][2]["content"], "hello");
    }

    #[test]
    fn test_embeddings_request_shape() {
        let texts = vec!["Hello".to_string(), "World".to_string()];
        let request = EmbeddingsRequest {
            model: "text-embedding-ada-002",
            input: &texts,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-ada-002");
        assert_eq!(json["input"][1], "World");
    }

    #[test]
    fn test_embeddings_are_reordered_by_index() {
        let body = r#"{
            "object": "list",
            "model": "text-embedding-ada-002",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
            ],
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        }"#;

        let response: EmbeddingsResponse = serde_json::from_str(body).unwrap();
        let embeddings = into_ordered_embeddings(response.data);

        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_completion_response_parsing() {
        let body = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-3.5-turbo-0125",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "42"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11}
        }"#;

        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.choices[0].message.content.as_deref(), Some("42"));
        assert_eq!(response.usage.and_then(|u| u.total_tokens), Some(11));
    }

    #[test]
    fn test_error_mapping() {
        let rate_limited = OpenAiError::ApiError {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(rate_limited.is_retryable());
        assert!(matches!(
            ChatCompletionError::from(rate_limited),
            ChatCompletionError::RateLimitExceeded
        ));

        let bad_request = OpenAiError::ApiError {
            status: 400,
            message: "bad".to_string(),
        };
        assert!(!bad_request.is_retryable());
        assert!(matches!(
            EmbeddingProviderError::from(bad_request),
            EmbeddingProviderError::ApiError(_)
        ));

        let outage = OpenAiError::ApiError {
            status: 503,
            message: "down".to_string(),
        };
        assert!(matches!(
            EmbeddingProviderError::from(outage),
            EmbeddingProviderError::ServiceUnavailable
        ));
    }
}
