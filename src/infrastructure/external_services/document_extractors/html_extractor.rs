use async_trait::async_trait;
use html2text::from_read;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent, ExtractionOptions,
};
use crate::domain::value_objects::DocumentType;

pub struct HtmlExtractor {
    width: usize,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        Self { width: 80 }
    }

    fn html_to_text(&self, html_content: &str) -> Result<String, DocumentExtractionError> {
        from_read(html_content.as_bytes(), self.width).map_err(|e| {
            DocumentExtractionError::ExtractionFailed(format!(
                "Failed to convert HTML to text: {}",
                e
            ))
        })
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for HtmlExtractor {
    async fn extract(
        &self,
        data: &[u8],
        document_type: DocumentType,
        options: ExtractionOptions,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        if document_type != DocumentType::Html {
            return Err(DocumentExtractionError::UnsupportedFormat(
                document_type.mime_type().to_string(),
            ));
        }

        let html_content = String::from_utf8_lossy(data);
        let text = self.html_to_text(&html_content)?;

        let title = if options.extract_metadata {
            extract_title_from_html(&html_content)
        } else {
            None
        };

        Ok(ExtractedContent::single(text, title))
    }

    fn supported_types(&self) -> Vec<DocumentType> {
        vec![DocumentType::Html]
    }

    fn max_file_size(&self) -> Option<usize> {
        Some(50 * 1024 * 1024) // 50MB max for HTML files
    }
}

fn extract_title_from_html(html: &str) -> Option<String> {
    let title_regex = regex::Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").ok()?;
    title_regex
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
