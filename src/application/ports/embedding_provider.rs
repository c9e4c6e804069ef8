use async_trait::async_trait;

#[derive(Debug)]
pub enum EmbeddingProviderError {
    NetworkError(String),
    ApiError(String),
    InvalidInput(String),
    RateLimitExceeded,
    ServiceUnavailable,
}

impl std::fmt::Display for EmbeddingProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProviderError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            EmbeddingProviderError::ApiError(msg) => write!(f, "API error: {}", msg),
            EmbeddingProviderError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EmbeddingProviderError::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            EmbeddingProviderError::ServiceUnavailable => write!(f, "Service unavailable"),
        }
    }
}

impl std::error::Error for EmbeddingProviderError {}

/// Vectors for one batch of texts.
#[derive(Debug, Clone)]
pub struct EmbeddingBatch {
    /// One vector per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    pub model_name: String,
    pub total_tokens: Option<i32>,
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `texts` in a single provider call. At most `max_batch_size`
    /// texts may be passed.
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch, EmbeddingProviderError>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        self.embed_batch(&[text.to_string()])
            .await?
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingProviderError::ApiError("No embedding returned".to_string()))
    }

    fn model_info(&self) -> String;

    fn max_batch_size(&self) -> usize;
}
