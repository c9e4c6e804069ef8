use std::sync::Arc;

use chrono::Utc;

use crate::application::services::IngestionService;
use crate::domain::repositories::{DocumentRepository, document_repository::DocumentRepositoryError};
use crate::domain::value_objects::DocumentType;

#[derive(Debug)]
pub enum UploadDocumentError {
    UnsupportedFileType(String),
    ValidationError(String),
    RepositoryError(String),
    IndexingFailed { file_name: String, reason: String },
}

impl std::fmt::Display for UploadDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadDocumentError::UnsupportedFileType(name) => write!(
                f,
                "Unsupported file type for {}. Allowed types are: {}",
                name,
                DocumentType::allowed_extensions_display()
            ),
            UploadDocumentError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            UploadDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            UploadDocumentError::IndexingFailed { file_name, reason } => {
                write!(f, "Failed to index {}: {}", file_name, reason)
            }
        }
    }
}

impl std::error::Error for UploadDocumentError {}

impl From<DocumentRepositoryError> for UploadDocumentError {
    fn from(error: DocumentRepositoryError) -> Self {
        UploadDocumentError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub file_name: String,
    pub file_data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentResponse {
    pub file_id: i32,
    pub file_name: String,
    pub chunk_count: usize,
}

pub struct UploadDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    ingestion_service: Arc<IngestionService>,
}

impl UploadDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        ingestion_service: Arc<IngestionService>,
    ) -> Self {
        Self {
            document_repository,
            ingestion_service,
        }
    }

    pub async fn execute(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, UploadDocumentError> {
        if request.file_name.trim().is_empty() {
            return Err(UploadDocumentError::ValidationError(
                "File name cannot be empty".to_string(),
            ));
        }

        if DocumentType::from_file_name(&request.file_name).is_none() {
            return Err(UploadDocumentError::UnsupportedFileType(request.file_name));
        }

        if request.file_data.is_empty() {
            return Err(UploadDocumentError::ValidationError(
                "File data cannot be empty".to_string(),
            ));
        }

        let file_id = self
            .document_repository
            .insert(&request.file_name, Utc::now().naive_utc())
            .await?;

        match self
            .ingestion_service
            .index_document(file_id, &request.file_name, &request.file_data)
            .await
        {
            Ok(chunk_count) => Ok(UploadDocumentResponse {
                file_id,
                file_name: request.file_name,
                chunk_count,
            }),
            Err(e) => {
                tracing::error!("Error indexing {} (file_id {}): {}", request.file_name, file_id, e);

                // Best effort: neither chunks nor the record may outlive a failed index.
                if let Err(cleanup) = self.ingestion_service.remove_document(file_id).await {
                    tracing::error!(
                        "Failed to remove chunks for {} after indexing failure: {}",
                        file_id,
                        cleanup
                    );
                }
                if let Err(cleanup) = self.document_repository.delete(file_id).await {
                    tracing::error!(
                        "Failed to remove record {} after indexing failure: {}",
                        file_id,
                        cleanup
                    );
                }

                Err(UploadDocumentError::IndexingFailed {
                    file_name: request.file_name,
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::VectorIndex;
    use crate::infrastructure::database::{SqliteDocumentRepository, initialize_database};
    use crate::infrastructure::external_services::RTSplitter;
    use crate::infrastructure::external_services::document_extractors::CompositeDocumentExtractor;
    use crate::test_support::UnreliableVectorIndex;

    const PAGE: &[u8] = b"<html><body><p>Quarterly numbers went up.</p></body></html>";

    #[tokio::test]
    async fn test_failed_index_leaves_neither_record_nor_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("upload.db").to_string_lossy().to_string();
        initialize_database(&url).unwrap();

        let repository = Arc::new(SqliteDocumentRepository::new(url));
        let index = Arc::new(UnreliableVectorIndex::failing_after_write());
        let ingestion = Arc::new(IngestionService::new(
            Arc::new(CompositeDocumentExtractor::new()),
            Arc::new(RTSplitter::default()),
            index.clone(),
        ));
        let use_case = UploadDocumentUseCase::new(repository.clone(), ingestion);

        let result = use_case
            .execute(UploadDocumentRequest {
                file_name: "report.html".to_string(),
                file_data: PAGE.to_vec(),
            })
            .await;

        assert!(matches!(
            result,
            Err(UploadDocumentError::IndexingFailed { ref file_name, .. }) if file_name == "report.html"
        ));
        assert!(repository.find_all().await.unwrap().is_empty());
        // The first upload gets id 1.
        assert_eq!(index.count_by_file_id(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_type_is_checked_before_insert() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("upload.db").to_string_lossy().to_string();
        initialize_database(&url).unwrap();

        let repository = Arc::new(SqliteDocumentRepository::new(url));
        let ingestion = Arc::new(IngestionService::new(
            Arc::new(CompositeDocumentExtractor::new()),
            Arc::new(RTSplitter::default()),
            Arc::new(UnreliableVectorIndex::failing_after_write()),
        ));
        let use_case = UploadDocumentUseCase::new(repository.clone(), ingestion);

        let result = use_case
            .execute(UploadDocumentRequest {
                file_name: "notes.txt".to_string(),
                file_data: b"plain".to_vec(),
            })
            .await;

        assert!(matches!(result, Err(UploadDocumentError::UnsupportedFileType(_))));
        assert!(repository.find_all().await.unwrap().is_empty());
    }
}
