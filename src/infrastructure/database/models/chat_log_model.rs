use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::entities::ChatTurn;
use crate::domain::value_objects::ChatModel;
use crate::infrastructure::database::schema::application_logs;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = application_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChatLogModel {
    pub id: i32,
    pub session_id: String,
    pub user_query: String,
    pub gpt_response: String,
    pub model: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = application_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewChatLogModel<'a> {
    pub session_id: &'a str,
    pub user_query: &'a str,
    pub gpt_response: &'a str,
    pub model: &'a str,
    pub created_at: NaiveDateTime,
}

impl<'a> From<&'a ChatTurn> for NewChatLogModel<'a> {
    fn from(turn: &'a ChatTurn) -> Self {
        Self {
            session_id: turn.session_id(),
            user_query: turn.user_query(),
            gpt_response: turn.assistant_response(),
            model: turn.model().as_str(),
            created_at: turn.created_at(),
        }
    }
}

impl TryFrom<ChatLogModel> for ChatTurn {
    type Error = String;

    fn try_from(model: ChatLogModel) -> Result<Self, Self::Error> {
        let chat_model = model
            .model
            .parse::<ChatModel>()
            .map_err(|e| format!("Invalid model in log {}: {}", model.id, e))?;

        Ok(ChatTurn::restore(
            model.session_id,
            model.user_query,
            model.gpt_response,
            chat_model,
            model.created_at,
        ))
    }
}
