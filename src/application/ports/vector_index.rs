use async_trait::async_trait;

use crate::domain::entities::DocumentChunk;

#[derive(Debug)]
pub enum VectorIndexError {
    EmbeddingError(String),
    StorageError(String),
    SerializationError(String),
}

impl std::fmt::Display for VectorIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorIndexError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            VectorIndexError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            VectorIndexError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for VectorIndexError {}

#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Persistent embedding index. Implementations embed text themselves, so
/// callers only ever deal in chunks and query strings.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embeds and stores the chunks, returning how many were written.
    async fn add_chunks(&self, chunks: &[DocumentChunk]) -> Result<usize, VectorIndexError>;

    /// The `k` chunks closest to `query`, most similar first.
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorIndexError>;

    /// Removes every chunk tagged with `file_id`, returning how many went.
    async fn delete_by_file_id(&self, file_id: i32) -> Result<usize, VectorIndexError>;

    #[cfg(test)]
    async fn count_by_file_id(&self, file_id: i32) -> Result<usize, VectorIndexError>;
}
