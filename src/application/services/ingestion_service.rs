use std::sync::Arc;

use crate::application::ports::{
    DocumentExtractor, RecursiveTextSplitter, VectorIndex,
    document_extractor::{DocumentExtractionError, ExtractedContent, ExtractionOptions},
};
use crate::domain::entities::{ChunkMetadata, DocumentChunk};
use crate::domain::value_objects::DocumentType;

#[derive(Debug)]
pub enum IngestionError {
    UnsupportedFormat(String),
    ExtractionError(String),
    IndexError(String),
}

impl std::fmt::Display for IngestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestionError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            IngestionError::ExtractionError(msg) => write!(f, "Extraction error: {}", msg),
            IngestionError::IndexError(msg) => write!(f, "Index error: {}", msg),
        }
    }
}

impl std::error::Error for IngestionError {}

impl From<DocumentExtractionError> for IngestionError {
    fn from(error: DocumentExtractionError) -> Self {
        match error {
            DocumentExtractionError::UnsupportedFormat(msg) => IngestionError::UnsupportedFormat(msg),
            other => IngestionError::ExtractionError(other.to_string()),
        }
    }
}

/// Turns uploaded bytes into tagged chunks and hands them to the vector index.
pub struct IngestionService {
    document_extractor: Arc<dyn DocumentExtractor>,
    text_splitter: Arc<dyn RecursiveTextSplitter>,
    vector_index: Arc<dyn VectorIndex>,
}

impl IngestionService {
    pub fn new(
        document_extractor: Arc<dyn DocumentExtractor>,
        text_splitter: Arc<dyn RecursiveTextSplitter>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            document_extractor,
            text_splitter,
            vector_index,
        }
    }

    /// Extracts and splits a document without touching the index.
    pub async fn load_and_split(
        &self,
        file_id: i32,
        filename: &str,
        data: &[u8],
    ) -> Result<Vec<DocumentChunk>, IngestionError> {
        let document_type = DocumentType::from_file_name(filename).ok_or_else(|| {
            IngestionError::UnsupportedFormat(format!(
                "{} (allowed: {})",
                filename,
                DocumentType::allowed_extensions_display()
            ))
        })?;

        let content = self
            .document_extractor
            .extract(data, document_type, ExtractionOptions::default())
            .await?;

        if !content.has_text() {
            return Err(IngestionError::ExtractionError(format!(
                "No text could be extracted from {}",
                filename
            )));
        }

        tracing::info!(
            "Extracted {} sections from {} (title: {:?}, pages: {:?})",
            content.sections.len(),
            filename,
            content.title,
            content.page_count
        );

        Ok(self.split_content(file_id, filename, &content))
    }

    fn split_content(
        &self,
        file_id: i32,
        filename: &str,
        content: &ExtractedContent,
    ) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        let mut chunk_index = 0;

        for section in &content.sections {
            for text in self.text_splitter.split_text(&section.text) {
                chunks.push(DocumentChunk::new(
                    text,
                    ChunkMetadata {
                        file_id,
                        source: filename.to_string(),
                        page: section.page_number,
                        chunk_index,
                    },
                ));
                chunk_index += 1;
            }
        }

        chunks
    }

    /// Returns the number of chunks written.
    pub async fn index_document(
        &self,
        file_id: i32,
        filename: &str,
        data: &[u8],
    ) -> Result<usize, IngestionError> {
        let chunks = self.load_and_split(file_id, filename, data).await?;

        let indexed = self
            .vector_index
            .add_chunks(&chunks)
            .await
            .map_err(|e| IngestionError::IndexError(e.to_string()))?;

        tracing::info!(
            "Indexed {} chunks from {} (file_id {})",
            indexed,
            filename,
            file_id
        );
        Ok(indexed)
    }

    pub async fn remove_document(&self, file_id: i32) -> Result<usize, IngestionError> {
        let removed = self
            .vector_index
            .delete_by_file_id(file_id)
            .await
            .map_err(|e| IngestionError::IndexError(e.to_string()))?;

        tracing::info!("Deleted {} chunks for file_id {}", removed, file_id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::external_services::RTSplitter;
    use crate::infrastructure::external_services::document_extractors::CompositeDocumentExtractor;
    use crate::infrastructure::vector_store::SledVectorIndex;
    use crate::test_support::{FakeEmbeddingProvider, pdf_with_pages};

    fn service(embeddings: FakeEmbeddingProvider) -> (IngestionService, Arc<SledVectorIndex>) {
        let index = Arc::new(SledVectorIndex::temporary(Arc::new(embeddings)).unwrap());
        let service = IngestionService::new(
            Arc::new(CompositeDocumentExtractor::new()),
            Arc::new(RTSplitter::new(60, 10)),
            index.clone(),
        );
        (service, index)
    }

    const PAGE: &str = "<html><head><title>Guide</title></head><body>\
        <p>Rust ownership rules keep memory safe without a garbage collector.</p>\
        <p>Borrowing lets code read data without taking ownership of it.</p>\
        </body></html>";

    #[tokio::test]
    async fn test_split_tags_every_chunk() {
        let (service, _) = service(FakeEmbeddingProvider::new());

        let chunks = service
            .load_and_split(4, "guide.html", PAGE.as_bytes())
            .await
            .unwrap();

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.file_id(), 4);
            assert_eq!(chunk.metadata().source, "guide.html");
            assert_eq!(chunk.metadata().chunk_index, i as i32);
            assert!(chunk.text().chars().count() <= 60);
        }
    }

    #[tokio::test]
    async fn test_pdf_chunks_carry_page_numbers() {
        let (service, _) = service(FakeEmbeddingProvider::new());
        let data = pdf_with_pages(&["Intro page", "Appendix page"]);

        let chunks = service.load_and_split(3, "manual.pdf", &data).await.unwrap();

        let pages: Vec<Option<i32>> = chunks.iter().map(|c| c.metadata().page).collect();
        assert_eq!(pages, vec![Some(1), Some(2)]);
        assert!(chunks[0].text().contains("Intro page"));
        assert!(chunks[1].text().contains("Appendix page"));
        assert_eq!(chunks[1].metadata().chunk_index, 1);
    }

    #[tokio::test]
    async fn test_unknown_extension_is_rejected() {
        let (service, _) = service(FakeEmbeddingProvider::new());

        let result = service.index_document(1, "notes.txt", b"plain text").await;

        assert!(matches!(result, Err(IngestionError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_empty_document_is_an_error() {
        let (service, _) = service(FakeEmbeddingProvider::new());

        let result = service
            .index_document(1, "blank.html", b"<html><body>   </body></html>")
            .await;

        assert!(matches!(result, Err(IngestionError::ExtractionError(_))));
    }

    #[tokio::test]
    async fn test_index_then_remove() {
        let (service, index) = service(FakeEmbeddingProvider::new());

        let indexed = service
            .index_document(9, "GUIDE.HTM", PAGE.as_bytes())
            .await
            .unwrap();

        assert!(indexed > 0);
        assert_eq!(index.count_by_file_id(9).await.unwrap(), indexed);
        assert_eq!(service.remove_document(9).await.unwrap(), indexed);
        assert_eq!(index.count_by_file_id(9).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_index_error() {
        let (service, _) = service(FakeEmbeddingProvider::failing());

        let result = service.index_document(2, "guide.html", PAGE.as_bytes()).await;

        assert!(matches!(result, Err(IngestionError::IndexError(_))));
    }
}
