/// Splits extracted text into overlapping windows ready for embedding.
pub trait RecursiveTextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;
}
