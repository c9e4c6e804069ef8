use std::sync::Arc;

use crate::application::ports::{
    ChatCompletionProvider, VectorIndex,
    chat_completion::ChatCompletionRequest,
    vector_index::ScoredChunk,
};
use crate::domain::value_objects::{ChatMessage, ChatModel};

pub const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context in the chat history, formulate a standalone question which can be \
understood without the chat history. Do NOT answer the question, just reformulate it if needed \
and otherwise return it as is.";

pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Use the following context to answer the user's question.";

#[derive(Debug)]
pub enum AnswerError {
    CompletionError(String),
    RetrievalError(String),
}

impl std::fmt::Display for AnswerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerError::CompletionError(msg) => write!(f, "Completion error: {}", msg),
            AnswerError::RetrievalError(msg) => write!(f, "Retrieval error: {}", msg),
        }
    }
}

impl std::error::Error for AnswerError {}

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub standalone_question: String,
    pub context: Vec<ScoredChunk>,
}

/// History-aware retrieval followed by a context-stuffed completion.
pub struct AnswerService {
    chat_provider: Arc<dyn ChatCompletionProvider>,
    vector_index: Arc<dyn VectorIndex>,
    retrieval_k: usize,
}

impl AnswerService {
    pub fn new(
        chat_provider: Arc<dyn ChatCompletionProvider>,
        vector_index: Arc<dyn VectorIndex>,
        retrieval_k: usize,
    ) -> Self {
        Self {
            chat_provider,
            vector_index,
            retrieval_k,
        }
    }

    pub async fn answer(
        &self,
        question: &str,
        history: &[ChatMessage],
        model: ChatModel,
    ) -> Result<Answer, AnswerError> {
        let standalone_question = self.contextualize(question, history, model).await?;

        let context = self
            .vector_index
            .similarity_search(&standalone_question, self.retrieval_k)
            .await
            .map_err(|e| AnswerError::RetrievalError(e.to_string()))?;

        let context_text = context
            .iter()
            .map(|scored| scored.chunk.text())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(ChatMessage::system(ANSWER_SYSTEM_PROMPT));
        messages.push(ChatMessage::system(format!("Context: {}", context_text)));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(question));

        let text = self.complete(model, messages).await?;

        Ok(Answer {
            text,
            standalone_question,
            context,
        })
    }

    async fn contextualize(
        &self,
        question: &str,
        history: &[ChatMessage],
        model: ChatModel,
    ) -> Result<String, AnswerError> {
        if history.is_empty() {
            return Ok(question.to_string());
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(CONTEXTUALIZE_SYSTEM_PROMPT));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(question));

        let rewritten = self.complete(model, messages).await?;
        if rewritten.trim().is_empty() {
            Ok(question.to_string())
        } else {
            Ok(rewritten)
        }
    }

    async fn complete(
        &self,
        model: ChatModel,
        messages: Vec<ChatMessage>,
    ) -> Result<String, AnswerError> {
        let response = self
            .chat_provider
            .complete(ChatCompletionRequest { model, messages })
            .await
            .map_err(|e| AnswerError::CompletionError(e.to_string()))?;

        tracing::debug!(
            "Completion from {} ({:?} tokens)",
            response.model,
            response.total_tokens
        );
        Ok(response.content)
    }
}
