use axum::{Json, extract::State};
use std::sync::Arc;

use crate::application::use_cases::ChatUseCase;
use crate::presentation::http::dto::{ApiError, ChatRequestDto, ChatResponseDto};

pub struct ChatHandler {
    chat_use_case: Arc<ChatUseCase>,
}

impl ChatHandler {
    pub fn new(chat_use_case: Arc<ChatUseCase>) -> Self {
        Self { chat_use_case }
    }

    pub async fn chat(
        State(handler): State<Arc<ChatHandler>>,
        Json(request): Json<ChatRequestDto>,
    ) -> Result<Json<ChatResponseDto>, ApiError> {
        let response = handler.chat_use_case.execute(request.into()).await?;
        Ok(Json(ChatResponseDto::from(response)))
    }
}
