use std::sync::Arc;

use crate::{
    application::{
        ports::{ChatCompletionProvider, DocumentExtractor, EmbeddingProvider, VectorIndex},
        services::{AnswerService, IngestionService},
        use_cases::{ChatUseCase, DeleteDocumentUseCase, ListDocumentsUseCase, UploadDocumentUseCase},
    },
    config::AppConfig,
    domain::repositories::{ChatLogRepository, DocumentRepository},
    infrastructure::{
        database::{SqliteChatLogRepository, SqliteDocumentRepository, initialize_database},
        external_services::{
            OpenAiChatProvider, OpenAiClient, OpenAiClientConfig, OpenAiEmbeddingProvider,
            RTSplitter, document_extractors::CompositeDocumentExtractor,
        },
        vector_store::SledVectorIndex,
    },
    presentation::http::handlers::{ChatHandler, DocumentHandler},
};

pub struct AppContainer {
    pub config: AppConfig,
    pub chat_handler: Arc<ChatHandler>,
    pub document_handler: Arc<DocumentHandler>,
}

impl AppContainer {
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let client = OpenAiClient::new(OpenAiClientConfig::from_app_config(&config))
            .map_err(|e| format!("Failed to create provider client: {}", e))?;

        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(OpenAiEmbeddingProvider::new(client.clone()));
        let chat_provider: Arc<dyn ChatCompletionProvider> =
            Arc::new(OpenAiChatProvider::new(client));

        Self::with_providers(config, embedding_provider, chat_provider)
    }

    /// Wires everything around the given providers.
    pub fn with_providers(
        config: AppConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        chat_provider: Arc<dyn ChatCompletionProvider>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        initialize_database(&config.database_url)
            .map_err(|e| format!("Failed to run database migrations: {}", e))?;

        // Create repositories
        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(SqliteDocumentRepository::new(config.database_url.clone()));
        let chat_log_repository: Arc<dyn ChatLogRepository> =
            Arc::new(SqliteChatLogRepository::new(config.database_url.clone()));

        // Create external services
        let document_extractor: Arc<dyn DocumentExtractor> =
            Arc::new(CompositeDocumentExtractor::new());
        let vector_index: Arc<dyn VectorIndex> = Arc::new(
            SledVectorIndex::open(&config.vector_store_path, embedding_provider)
                .map_err(|e| format!("Failed to open vector index: {}", e))?,
        );
        let text_splitter = Arc::new(RTSplitter::new(config.chunk_size, config.chunk_overlap));

        // Create application services
        let ingestion_service = Arc::new(IngestionService::new(
            document_extractor,
            text_splitter,
            vector_index.clone(),
        ));
        let answer_service = Arc::new(AnswerService::new(
            chat_provider,
            vector_index,
            config.retrieval_k,
        ));

        // Create use cases
        let chat_use_case = Arc::new(ChatUseCase::new(chat_log_repository, answer_service));
        let upload_document_use_case = Arc::new(UploadDocumentUseCase::new(
            document_repository.clone(),
            ingestion_service.clone(),
        ));
        let list_documents_use_case =
            Arc::new(ListDocumentsUseCase::new(document_repository.clone()));
        let delete_document_use_case = Arc::new(DeleteDocumentUseCase::new(
            ingestion_service,
            document_repository,
        ));

        // Create HTTP handlers
        let chat_handler = Arc::new(ChatHandler::new(chat_use_case));
        let document_handler = Arc::new(DocumentHandler::new(
            upload_document_use_case,
            list_documents_use_case,
            delete_document_use_case,
        ));

        Ok(Self {
            config,
            chat_handler,
            document_handler,
        })
    }
}
