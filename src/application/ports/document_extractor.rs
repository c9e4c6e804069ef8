use async_trait::async_trait;

use crate::domain::value_objects::DocumentType;

#[derive(Debug)]
pub enum DocumentExtractionError {
    UnsupportedFormat(String),
    CorruptedFile(String),
    ExtractionFailed(String),
}

impl std::fmt::Display for DocumentExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentExtractionError::UnsupportedFormat(format) => write!(f, "Unsupported format: {}", format),
            DocumentExtractionError::CorruptedFile(msg) => write!(f, "Corrupted file: {}", msg),
            DocumentExtractionError::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
        }
    }
}

impl std::error::Error for DocumentExtractionError {}

/// A contiguous run of text, one per PDF page or one for the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSection {
    pub text: String,
    pub page_number: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub sections: Vec<ExtractedSection>,
    pub title: Option<String>,
    pub page_count: Option<i32>,
}

impl ExtractedContent {
    pub fn single(text: String, title: Option<String>) -> Self {
        Self {
            sections: vec![ExtractedSection {
                text,
                page_number: None,
            }],
            title,
            page_count: Some(1),
        }
    }

    #[cfg(test)]
    pub fn full_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_text(&self) -> bool {
        self.sections.iter().any(|s| !s.text.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    pub extract_metadata: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            extract_metadata: true,
        }
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(
        &self,
        data: &[u8],
        document_type: DocumentType,
        options: ExtractionOptions,
    ) -> Result<ExtractedContent, DocumentExtractionError>;

    fn supported_types(&self) -> Vec<DocumentType>;

    fn can_extract(&self, document_type: DocumentType) -> bool {
        self.supported_types().contains(&document_type)
    }

    fn max_file_size(&self) -> Option<usize>;
}
