pub mod chat_message;
pub mod chat_model;
pub mod document_type;

pub use chat_message::ChatMessage;
pub use chat_model::ChatModel;
pub use document_type::DocumentType;
