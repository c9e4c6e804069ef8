pub mod chat_log_model;
pub mod document_model;

pub use chat_log_model::*;
pub use document_model::*;
