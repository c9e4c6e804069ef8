use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::entities::UploadedFile;

#[derive(Debug)]
pub enum DocumentRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for DocumentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            DocumentRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentRepositoryError {}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Records an upload and returns the generated file id.
    async fn insert(
        &self,
        filename: &str,
        upload_timestamp: NaiveDateTime,
    ) -> Result<i32, DocumentRepositoryError>;
    /// Newest upload first.
    async fn find_all(&self) -> Result<Vec<UploadedFile>, DocumentRepositoryError>;
    /// Returns whether a row was removed. Missing ids are not an error.
    async fn delete(&self, id: i32) -> Result<bool, DocumentRepositoryError>;
}
