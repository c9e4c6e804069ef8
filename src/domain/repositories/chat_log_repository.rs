use async_trait::async_trait;

use crate::domain::entities::ChatTurn;

#[derive(Debug)]
pub enum ChatLogRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ChatLogRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatLogRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ChatLogRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ChatLogRepositoryError {}

#[async_trait]
pub trait ChatLogRepository: Send + Sync {
    async fn append(&self, turn: &ChatTurn) -> Result<(), ChatLogRepositoryError>;
    /// Turns of one session, oldest first.
    async fn find_by_session(&self, session_id: &str)
    -> Result<Vec<ChatTurn>, ChatLogRepositoryError>;
}
