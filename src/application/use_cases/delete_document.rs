use std::sync::Arc;

use crate::application::services::IngestionService;
use crate::domain::repositories::DocumentRepository;

#[derive(Debug)]
pub enum DeleteDocumentError {
    VectorIndexFailed { file_id: i32, reason: String },
    RecordDeleteFailed { file_id: i32, reason: String },
}

impl DeleteDocumentError {
    /// Client-facing message naming the store that failed.
    pub fn public_message(&self) -> String {
        match self {
            DeleteDocumentError::VectorIndexFailed { file_id, .. } => format!(
                "Failed to delete document with file_id {} from the vector index.",
                file_id
            ),
            DeleteDocumentError::RecordDeleteFailed { file_id, .. } => format!(
                "Failed to delete document with file_id {} from the database.",
                file_id
            ),
        }
    }
}

impl std::fmt::Display for DeleteDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteDocumentError::VectorIndexFailed { file_id, reason } => {
                write!(f, "Vector index delete failed for {}: {}", file_id, reason)
            }
            DeleteDocumentError::RecordDeleteFailed { file_id, reason } => {
                write!(f, "Record delete failed for {}: {}", file_id, reason)
            }
        }
    }
}

impl std::error::Error for DeleteDocumentError {}

#[derive(Debug, Clone)]
pub struct DeleteDocumentRequest {
    pub file_id: i32,
}

#[derive(Debug, Clone)]
pub struct DeleteDocumentResponse {
    pub file_id: i32,
    pub chunks_removed: usize,
    pub record_removed: bool,
}

pub struct DeleteDocumentUseCase {
    ingestion_service: Arc<IngestionService>,
    document_repository: Arc<dyn DocumentRepository>,
}

impl DeleteDocumentUseCase {
    pub fn new(
        ingestion_service: Arc<IngestionService>,
        document_repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            ingestion_service,
            document_repository,
        }
    }

    /// Removes chunks first, then the record. The two steps are independent;
    /// a failure in the second leaves the record without chunks.
    pub async fn execute(
        &self,
        request: DeleteDocumentRequest,
    ) -> Result<DeleteDocumentResponse, DeleteDocumentError> {
        let file_id = request.file_id;

        let chunks_removed = self
            .ingestion_service
            .remove_document(file_id)
            .await
            .map_err(|e| {
                tracing::error!("Error deleting chunks for file_id {}: {}", file_id, e);
                DeleteDocumentError::VectorIndexFailed {
                    file_id,
                    reason: e.to_string(),
                }
            })?;

        let record_removed = self
            .document_repository
            .delete(file_id)
            .await
            .map_err(|e| {
                tracing::error!("Error deleting record for file_id {}: {}", file_id, e);
                DeleteDocumentError::RecordDeleteFailed {
                    file_id,
                    reason: e.to_string(),
                }
            })?;

        Ok(DeleteDocumentResponse {
            file_id,
            chunks_removed,
            record_removed,
        })
    }
}
