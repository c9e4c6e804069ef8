use async_trait::async_trait;
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild, read_docx,
};

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent, ExtractionOptions,
};
use crate::domain::value_objects::DocumentType;

/// Body text of a Word document: paragraphs in order, table cells row by row.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn table_text(table: &Table, out: &mut Vec<String>) {
    for TableChild::TableRow(row) in &table.rows {
        let mut cells = Vec::new();
        for TableRowChild::TableCell(cell) in &row.cells {
            let mut cell_lines = Vec::new();
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => cell_lines.push(paragraph_text(p)),
                    TableCellContent::Table(nested) => table_text(nested, &mut cell_lines),
                    _ => {}
                }
            }
            cells.push(cell_lines.join(" "));
        }
        out.push(cells.join("\t"));
    }
}

#[async_trait]
impl DocumentExtractor for DocxExtractor {
    async fn extract(
        &self,
        data: &[u8],
        document_type: DocumentType,
        _options: ExtractionOptions,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        if document_type != DocumentType::Docx {
            return Err(DocumentExtractionError::UnsupportedFormat(
                document_type.mime_type().to_string(),
            ));
        }

        let docx = read_docx(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        let mut lines = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
                DocumentChild::Table(t) => table_text(t, &mut lines),
                _ => {}
            }
        }

        Ok(ExtractedContent::single(lines.join("\n"), None))
    }

    fn supported_types(&self) -> Vec<DocumentType> {
        vec![DocumentType::Docx]
    }

    fn max_file_size(&self) -> Option<usize> {
        Some(50 * 1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run};
    use std::io::Cursor;

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }

        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[tokio::test]
    async fn test_extracts_paragraphs_in_order() {
        let bytes = build_docx(&["First paragraph.", "Second paragraph."]);

        let content = DocxExtractor::new()
            .extract(&bytes, DocumentType::Docx, ExtractionOptions::default())
            .await
            .unwrap();

        assert_eq!(content.full_text(), "First paragraph.\nSecond paragraph.");
    }

    #[tokio::test]
    async fn test_rejects_garbage() {
        let result = DocxExtractor::new()
            .extract(b"not a zip", DocumentType::Docx, ExtractionOptions::default())
            .await;

        assert!(matches!(result, Err(DocumentExtractionError::CorruptedFile(_))));
    }
}
