use async_trait::async_trait;
use std::sync::Arc;

use super::{DocxExtractor, HtmlExtractor, PdfExtractor};
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent, ExtractionOptions,
};
use crate::domain::value_objects::DocumentType;

/// Routes each document type to the extractor that understands it.
pub struct CompositeDocumentExtractor {
    html_extractor: Arc<HtmlExtractor>,
    pdf_extractor: Arc<PdfExtractor>,
    docx_extractor: Arc<DocxExtractor>,
}

impl CompositeDocumentExtractor {
    pub fn new() -> Self {
        Self {
            html_extractor: Arc::new(HtmlExtractor::new()),
            pdf_extractor: Arc::new(PdfExtractor::new()),
            docx_extractor: Arc::new(DocxExtractor::new()),
        }
    }

    fn get_extractor_for_type(
        &self,
        document_type: DocumentType,
    ) -> Option<Arc<dyn DocumentExtractor>> {
        if self.html_extractor.can_extract(document_type) {
            Some(self.html_extractor.clone())
        } else if self.pdf_extractor.can_extract(document_type) {
            Some(self.pdf_extractor.clone())
        } else if self.docx_extractor.can_extract(document_type) {
            Some(self.docx_extractor.clone())
        } else {
            None
        }
    }
}

impl Default for CompositeDocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for CompositeDocumentExtractor {
    async fn extract(
        &self,
        data: &[u8],
        document_type: DocumentType,
        options: ExtractionOptions,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        let extractor = self.get_extractor_for_type(document_type).ok_or_else(|| {
            DocumentExtractionError::UnsupportedFormat(document_type.mime_type().to_string())
        })?;

        if let Some(max_size) = extractor.max_file_size() {
            if data.len() > max_size {
                return Err(DocumentExtractionError::ExtractionFailed(format!(
                    "File is {} bytes, limit for {} is {} bytes",
                    data.len(),
                    document_type.mime_type(),
                    max_size
                )));
            }
        }

        extractor.extract(data, document_type, options).await
    }

    fn supported_types(&self) -> Vec<DocumentType> {
        let mut types = Vec::new();
        types.extend(self.html_extractor.supported_types());
        types.extend(self.pdf_extractor.supported_types());
        types.extend(self.docx_extractor.supported_types());
        types
    }

    fn max_file_size(&self) -> Option<usize> {
        [
            self.html_extractor.max_file_size(),
            self.pdf_extractor.max_file_size(),
            self.docx_extractor.max_file_size(),
        ]
        .iter()
        .filter_map(|&size| size)
        .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_document_type_has_an_extractor() {
        let composite = CompositeDocumentExtractor::new();
        for document_type in [DocumentType::Pdf, DocumentType::Docx, DocumentType::Html] {
            assert!(composite.can_extract(document_type));
            assert!(composite.get_extractor_for_type(document_type).is_some());
        }
        assert_eq!(composite.supported_types().len(), 3);
    }

    #[tokio::test]
    async fn test_dispatches_html() {
        let composite = CompositeDocumentExtractor::new();
        let content = composite
            .extract(
                b"<p>routed through the composite</p>",
                DocumentType::Html,
                ExtractionOptions::default(),
            )
            .await
            .unwrap();

        assert!(content.full_text().contains("routed through the composite"));
    }
}
