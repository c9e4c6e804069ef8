pub mod chat_completion;
pub mod document_extractor;
pub mod embedding_provider;
pub mod text_splitter;
pub mod vector_index;

pub use chat_completion::ChatCompletionProvider;
pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use text_splitter::RecursiveTextSplitter;
pub use vector_index::VectorIndex;
