use async_trait::async_trait;
use lopdf::{Document, Object};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::collections::BTreeMap;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent, ExtractedSection,
    ExtractionOptions,
};
use crate::domain::value_objects::DocumentType;

/// Extracts text page by page so every chunk can carry its page number.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(doc: &Document) -> (BTreeMap<u32, String>, Vec<String>) {
        let extracted_pages: Vec<Result<(u32, String), String>> = doc
            .get_pages()
            .into_par_iter()
            .map(|(page_num, _)| -> Result<(u32, String), String> {
                let text = doc.extract_text(&[page_num]).map_err(|e| {
                    format!("Failed to extract text from page {}: {}", page_num, e)
                })?;

                let lines: Vec<&str> = text
                    .split('\n')
                    .map(|s| s.trim_end())
                    .filter(|s| !s.is_empty())
                    .collect();

                Ok((page_num, lines.join("\n")))
            })
            .collect();

        let mut page_texts = BTreeMap::new();
        let mut errors = Vec::new();

        for page_result in extracted_pages {
            match page_result {
                Ok((page_num, text)) => {
                    page_texts.insert(page_num, text);
                }
                Err(e) => errors.push(e),
            }
        }

        (page_texts, errors)
    }

    fn extract_title(doc: &Document) -> Option<String> {
        let info = doc.trailer.get(b"Info").ok()?;
        let info_dict = match info {
            Object::Reference(id) => doc.get_dictionary(*id).ok()?,
            Object::Dictionary(dict) => dict,
            _ => return None,
        };

        let title = info_dict.get(b"Title").ok()?.as_str().ok()?;
        std::str::from_utf8(title)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(
        &self,
        data: &[u8],
        document_type: DocumentType,
        options: ExtractionOptions,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        if document_type != DocumentType::Pdf {
            return Err(DocumentExtractionError::UnsupportedFormat(
                document_type.mime_type().to_string(),
            ));
        }

        let mut doc = Document::load_mem(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        // Only PDFs protected by an empty user password can be opened.
        if doc.is_encrypted() {
            doc.decrypt("").map_err(|_e| {
                DocumentExtractionError::ExtractionFailed(
                    "PDF is password protected".to_string(),
                )
            })?;
        }

        let (page_texts, errors) = Self::extract_pages(&doc);
        for error in &errors {
            tracing::warn!("{}", error);
        }

        let title = if options.extract_metadata {
            Self::extract_title(&doc)
        } else {
            None
        };

        let page_count = page_texts.len() as i32;
        let sections = page_texts
            .into_iter()
            .map(|(page_num, text)| ExtractedSection {
                text,
                page_number: Some(page_num as i32),
            })
            .collect();

        Ok(ExtractedContent {
            sections,
            title,
            page_count: Some(page_count),
        })
    }

    fn supported_types(&self) -> Vec<DocumentType> {
        vec![DocumentType::Pdf]
    }

    fn max_file_size(&self) -> Option<usize> {
        Some(100 * 1024 * 1024) // 100MB max for PDF files
    }
}
