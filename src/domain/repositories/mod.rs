pub mod chat_log_repository;
pub mod document_repository;

pub use chat_log_repository::ChatLogRepository;
pub use document_repository::DocumentRepository;
