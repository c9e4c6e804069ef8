use async_trait::async_trait;

use crate::domain::value_objects::{ChatMessage, ChatModel};

#[derive(Debug)]
pub enum ChatCompletionError {
    NetworkError(String),
    ApiError { status: u16, message: String },
    RateLimitExceeded,
    EmptyResponse,
}

impl std::fmt::Display for ChatCompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatCompletionError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ChatCompletionError::ApiError { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            ChatCompletionError::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            ChatCompletionError::EmptyResponse => write!(f, "Model returned no choices"),
        }
    }
}

impl std::error::Error for ChatCompletionError {}

#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: ChatModel,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone)]
pub struct ChatCompletionResponse {
    pub content: String,
    pub model: String,
    pub total_tokens: Option<i32>,
}

#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatCompletionError>;
}
