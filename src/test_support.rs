use std::sync::Mutex;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::application::ports::ChatCompletionProvider;
use crate::application::ports::EmbeddingProvider;
use crate::application::ports::VectorIndex;
use crate::application::ports::chat_completion::{
    ChatCompletionError, ChatCompletionRequest, ChatCompletionResponse,
};
use crate::application::ports::embedding_provider::{EmbeddingBatch, EmbeddingProviderError};
use crate::application::ports::vector_index::{ScoredChunk, VectorIndexError};
use crate::application::services::answer_service::CONTEXTUALIZE_SYSTEM_PROMPT;
use crate::config::AppConfig;
use crate::domain::entities::DocumentChunk;
use crate::domain::value_objects::chat_message::MessageRole;

/// Embeds text as its a-z letter histogram, so similar spellings score close.
pub struct FakeEmbeddingProvider {
    fail: bool,
}

impl FakeEmbeddingProvider {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }

    pub fn embed(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; 26];
        for c in text.chars().flat_map(char::to_lowercase) {
            if c.is_ascii_lowercase() {
                vector[(c as u8 - b'a') as usize] += 1.0;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch, EmbeddingProviderError> {
        if self.fail {
            return Err(EmbeddingProviderError::ServiceUnavailable);
        }
        Ok(EmbeddingBatch {
            embeddings: texts.iter().map(|t| Self::embed(t)).collect(),
            model_name: "fake".to_string(),
            total_tokens: None,
        })
    }

    fn model_info(&self) -> String {
        "fake-letter-histogram".to_string()
    }

    fn max_batch_size(&self) -> usize {
        2
    }
}

/// Echoes the user question for rewrite calls and prefixes it with
/// `answer: ` otherwise. Every request is kept for inspection.
pub struct FakeChatProvider {
    fail: bool,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl FakeChatProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionProvider for FakeChatProvider {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatCompletionError> {
        self.requests.lock().unwrap().push(request.clone());

        if self.fail {
            return Err(ChatCompletionError::ApiError {
                status: 503,
                message: "upstream down".to_string(),
            });
        }

        let question = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let is_rewrite = request
            .messages
            .first()
            .is_some_and(|m| m.content == CONTEXTUALIZE_SYSTEM_PROMPT);

        let content = if is_rewrite {
            question
        } else {
            format!("answer: {}", question)
        };

        Ok(ChatCompletionResponse {
            content,
            model: request.model.as_str().to_string(),
            total_tokens: None,
        })
    }
}

/// In-memory index that keeps every write but still reports failure, like a
/// store whose batch was applied before the flush broke.
pub struct UnreliableVectorIndex {
    chunks: Mutex<Vec<DocumentChunk>>,
    fail_deletes: bool,
}

impl UnreliableVectorIndex {
    pub fn failing_after_write() -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            fail_deletes: false,
        }
    }

    pub fn failing_deletes() -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            fail_deletes: true,
        }
    }
}

#[async_trait]
impl VectorIndex for UnreliableVectorIndex {
    async fn add_chunks(&self, chunks: &[DocumentChunk]) -> Result<usize, VectorIndexError> {
        self.chunks.lock().unwrap().extend_from_slice(chunks);
        Err(VectorIndexError::StorageError("flush failed".to_string()))
    }

    async fn similarity_search(
        &self,
        _query: &str,
        _k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorIndexError> {
        Ok(Vec::new())
    }

    async fn delete_by_file_id(&self, file_id: i32) -> Result<usize, VectorIndexError> {
        if self.fail_deletes {
            return Err(VectorIndexError::StorageError("delete failed".to_string()));
        }
        let mut chunks = self.chunks.lock().unwrap();
        let before = chunks.len();
        chunks.retain(|c| c.file_id() != file_id);
        Ok(before - chunks.len())
    }

    async fn count_by_file_id(&self, file_id: i32) -> Result<usize, VectorIndexError> {
        let chunks = self.chunks.lock().unwrap();
        Ok(chunks.iter().filter(|c| c.file_id() == file_id).count())
    }
}

/// A PDF with one line of text per page, in the given order.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 14.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Config pointing at files inside `dir`.
pub fn test_config(dir: &std::path::Path) -> AppConfig {
    let database_url = dir.join("test.db").to_string_lossy().to_string();
    let vector_store_path = dir.join("vectors").to_string_lossy().to_string();

    AppConfig::from_lookup(|name| match name {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "DATABASE_URL" => Some(database_url.clone()),
        "VECTOR_STORE_PATH" => Some(vector_store_path.clone()),
        "MAX_UPLOAD_BYTES" => Some("1048576".to_string()),
        _ => None,
    })
    .unwrap()
}
