use std::path::Path;

/// File formats accepted for ingestion, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Pdf,
    Docx,
    Html,
}

impl DocumentType {
    pub const ALLOWED_EXTENSIONS: [&'static str; 4] = [".pdf", ".docx", ".html", ".htm"];

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(DocumentType::Pdf),
            "docx" => Some(DocumentType::Docx),
            "html" | "htm" => Some(DocumentType::Html),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "application/pdf",
            DocumentType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentType::Html => "text/html",
        }
    }

    pub fn allowed_extensions_display() -> String {
        Self::ALLOWED_EXTENSIONS.join(", ")
    }
}
