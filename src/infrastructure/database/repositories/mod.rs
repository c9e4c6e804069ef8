pub mod sqlite_chat_log_repository;
pub mod sqlite_document_repository;

pub use sqlite_chat_log_repository::SqliteChatLogRepository;
pub use sqlite_document_repository::SqliteDocumentRepository;
