use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::application::use_cases::{
    DeleteDocumentUseCase, ListDocumentsUseCase, UploadDocumentUseCase,
    delete_document::DeleteDocumentRequest, upload_document::UploadDocumentRequest,
};
use crate::presentation::http::dto::{
    ApiError, DeleteDocumentRequestDto, DocumentInfoDto, ErrorMessageDto, MessageResponseDto,
    UploadResponseDto,
};

pub struct DocumentHandler {
    upload_use_case: Arc<UploadDocumentUseCase>,
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    delete_document_use_case: Arc<DeleteDocumentUseCase>,
}

impl DocumentHandler {
    pub fn new(
        upload_use_case: Arc<UploadDocumentUseCase>,
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        delete_document_use_case: Arc<DeleteDocumentUseCase>,
    ) -> Self {
        Self {
            upload_use_case,
            list_documents_use_case,
            delete_document_use_case,
        }
    }

    /// Takes the first multipart field that carries a file name.
    pub async fn upload_document(
        State(handler): State<Arc<DocumentHandler>>,
        mut multipart: Multipart,
    ) -> Result<Json<UploadResponseDto>, ApiError> {
        while let Some(field) = multipart.next_field().await? {
            let Some(file_name) = field.file_name().map(|name| name.to_string()) else {
                continue;
            };

            let data = field.bytes().await.map_err(|e| {
                tracing::warn!("Failed to read upload {}: {}", file_name, e);
                ApiError::from(e)
            })?;

            let request = UploadDocumentRequest {
                file_name,
                file_data: data.to_vec(),
            };

            let response = handler.upload_use_case.execute(request).await?;
            tracing::info!(
                "Uploaded {} as file_id {} ({} chunks)",
                response.file_name,
                response.file_id,
                response.chunk_count
            );
            return Ok(Json(UploadResponseDto::from(response)));
        }

        Err(ApiError::bad_request("No file provided"))
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
    ) -> Result<Json<Vec<DocumentInfoDto>>, ApiError> {
        let documents = handler.list_documents_use_case.execute().await.map_err(|e| {
            tracing::error!("Failed to list documents: {}", e);
            ApiError::from(e)
        })?;

        Ok(Json(
            documents.into_iter().map(DocumentInfoDto::from).collect(),
        ))
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Json(request): Json<DeleteDocumentRequestDto>,
    ) -> Response {
        let request = DeleteDocumentRequest {
            file_id: request.file_id,
        };

        match handler.delete_document_use_case.execute(request).await {
            Ok(response) => {
                tracing::info!(
                    "Deleted file_id {}: {} chunks, record removed: {}",
                    response.file_id,
                    response.chunks_removed,
                    response.record_removed
                );
                (
                    StatusCode::OK,
                    Json(MessageResponseDto {
                        message: format!(
                            "Successfully deleted document with file_id {}.",
                            response.file_id
                        ),
                    }),
                )
                    .into_response()
            }
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorMessageDto {
                    error: e.public_message(),
                }),
            )
                .into_response(),
        }
    }
}
