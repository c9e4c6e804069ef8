pub mod chat_turn;
pub mod document_chunk;
pub mod uploaded_file;

pub use chat_turn::{ChatTurn, history_messages};
pub use document_chunk::{ChunkMetadata, DocumentChunk};
pub use uploaded_file::UploadedFile;
