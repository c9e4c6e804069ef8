use axum::{
    Json, extract::multipart::MultipartError, http::StatusCode, response::IntoResponse,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::application::use_cases::{
    chat::ChatError, list_documents::ListDocumentsError, upload_document::UploadDocumentError,
};
use crate::domain::value_objects::DocumentType;

#[derive(Debug, Serialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponseDto {
    pub message: String,
}

/// Body of a failed two-step delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessageDto {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetailDto {
    pub detail: String,
}

/// Error returned by handlers, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorDetailDto {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::ValidationError(msg) => ApiError::bad_request(msg),
            ChatError::HistoryError(_) => ApiError::internal("Failed to load chat history."),
            ChatError::AnswerError(_) => ApiError::internal("Failed to generate an answer."),
        }
    }
}

impl From<UploadDocumentError> for ApiError {
    fn from(error: UploadDocumentError) -> Self {
        match error {
            UploadDocumentError::UnsupportedFileType(_) => ApiError::bad_request(format!(
                "Unsupported file type. Allowed types are: {}",
                DocumentType::allowed_extensions_display()
            )),
            UploadDocumentError::ValidationError(msg) => ApiError::bad_request(msg),
            UploadDocumentError::RepositoryError(_) => {
                ApiError::internal("Failed to store the document record.")
            }
            UploadDocumentError::IndexingFailed { file_name, .. } => {
                ApiError::internal(format!("Failed to index {}.", file_name))
            }
        }
    }
}

/// Keeps the status axum assigns, so an over-limit body is a 413.
impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        let status = error.status();
        let detail = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "Uploaded file exceeds the size limit.".to_string()
        } else {
            format!("Invalid multipart body: {}", error.body_text())
        };

        Self { status, detail }
    }
}

impl From<ListDocumentsError> for ApiError {
    fn from(_: ListDocumentsError) -> Self {
        ApiError::internal("Failed to list documents.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message() {
        let error = ApiError::from(UploadDocumentError::UnsupportedFileType("a.txt".to_string()));

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error.detail,
            "Unsupported file type. Allowed types are: .pdf, .docx, .html, .htm"
        );
    }

    #[test]
    fn test_indexing_failure_names_file() {
        let error = ApiError::from(UploadDocumentError::IndexingFailed {
            file_name: "report.pdf".to_string(),
            reason: "embedding error".to_string(),
        });

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.detail, "Failed to index report.pdf.");
    }
}
