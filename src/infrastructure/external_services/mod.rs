pub mod document_extractors;
pub mod openai_client;
pub mod text_splitter;

pub use openai_client::{OpenAiChatProvider, OpenAiClient, OpenAiClientConfig, OpenAiEmbeddingProvider};
pub use text_splitter::RTSplitter;
