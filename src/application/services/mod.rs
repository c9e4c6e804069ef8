pub mod answer_service;
pub mod ingestion_service;

pub use answer_service::AnswerService;
pub use ingestion_service::IngestionService;
