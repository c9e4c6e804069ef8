pub mod chat;
pub mod delete_document;
pub mod list_documents;
pub mod upload_document;

pub use chat::ChatUseCase;
pub use delete_document::DeleteDocumentUseCase;
pub use list_documents::ListDocumentsUseCase;
pub use upload_document::UploadDocumentUseCase;
