use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AnswerService;
use crate::domain::entities::{ChatTurn, history_messages};
use crate::domain::repositories::ChatLogRepository;
use crate::domain::value_objects::ChatModel;

#[derive(Debug)]
pub enum ChatError {
    ValidationError(String),
    HistoryError(String),
    AnswerError(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ChatError::HistoryError(msg) => write!(f, "History error: {}", msg),
            ChatError::AnswerError(msg) => write!(f, "Answer error: {}", msg),
        }
    }
}

impl std::error::Error for ChatError {}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub question: String,
    pub session_id: Option<String>,
    pub model: ChatModel,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub answer: String,
    pub session_id: String,
    pub model: ChatModel,
}

pub struct ChatUseCase {
    chat_log_repository: Arc<dyn ChatLogRepository>,
    answer_service: Arc<AnswerService>,
}

impl ChatUseCase {
    pub fn new(
        chat_log_repository: Arc<dyn ChatLogRepository>,
        answer_service: Arc<AnswerService>,
    ) -> Self {
        Self {
            chat_log_repository,
            answer_service,
        }
    }

    pub async fn execute(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        if request.question.trim().is_empty() {
            return Err(ChatError::ValidationError(
                "Question cannot be empty".to_string(),
            ));
        }

        let session_id = request
            .session_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::info!(
            "Session ID: {}, User Query: {}, Model: {}",
            session_id,
            request.question,
            request.model
        );

        let turns = self
            .chat_log_repository
            .find_by_session(&session_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load history for session {}: {}", session_id, e);
                ChatError::HistoryError(e.to_string())
            })?;
        let history = history_messages(&turns);

        let answer = self
            .answer_service
            .answer(&request.question, &history, request.model)
            .await
            .map_err(|e| {
                tracing::error!("Answer pipeline failed for session {}: {}", session_id, e);
                ChatError::AnswerError(e.to_string())
            })?;

        tracing::debug!(
            "Answered with {} context chunks for standalone question {:?}",
            answer.context.len(),
            answer.standalone_question
        );

        let turn = ChatTurn::new(
            session_id.clone(),
            request.question,
            answer.text.clone(),
            request.model,
        );
        if let Err(e) = self.chat_log_repository.append(&turn).await {
            tracing::error!("Failed to store chat log for session {}: {}", session_id, e);
        }

        tracing::info!("Session ID: {}, AI Response: {}", session_id, answer.text);

        Ok(ChatResponse {
            answer: answer.text,
            session_id,
            model: request.model,
        })
    }
}
