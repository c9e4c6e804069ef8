use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ChatMessage, ChatModel};

/// One question/answer exchange inside a session. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    session_id: String,
    user_query: String,
    assistant_response: String,
    model: ChatModel,
    created_at: NaiveDateTime,
}

impl ChatTurn {
    pub fn new(
        session_id: String,
        user_query: String,
        assistant_response: String,
        model: ChatModel,
    ) -> Self {
        Self {
            session_id,
            user_query,
            assistant_response,
            model,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn restore(
        session_id: String,
        user_query: String,
        assistant_response: String,
        model: ChatModel,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            session_id,
            user_query,
            assistant_response,
            model,
            created_at,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub fn assistant_response(&self) -> &str {
        &self.assistant_response
    }

    pub fn model(&self) -> ChatModel {
        self.model
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// The turn as it appears in a prompt: the user message, then the reply.
    pub fn to_messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::user(self.user_query.clone()),
            ChatMessage::assistant(self.assistant_response.clone()),
        ]
    }
}

/// Flattens turns, already in chronological order, into prompt history.
pub fn history_messages(turns: &[ChatTurn]) -> Vec<ChatMessage> {
    turns.iter().flat_map(ChatTurn::to_messages).collect()
}
