use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::ChatTurn;
use crate::domain::repositories::{
    ChatLogRepository, chat_log_repository::ChatLogRepositoryError,
};
use crate::infrastructure::database::get_database_connection;
use crate::infrastructure::database::models::{ChatLogModel, NewChatLogModel};
use crate::infrastructure::database::schema::application_logs::dsl::*;

pub struct SqliteChatLogRepository {
    database_url: String,
}

impl SqliteChatLogRepository {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    fn connection(&self) -> Result<SqliteConnection, ChatLogRepositoryError> {
        get_database_connection(&self.database_url)
            .map_err(|e| ChatLogRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl ChatLogRepository for SqliteChatLogRepository {
    async fn append(&self, turn: &ChatTurn) -> Result<(), ChatLogRepositoryError> {
        let mut conn = self.connection()?;

        diesel::insert_into(application_logs)
            .values(NewChatLogModel::from(turn))
            .execute(&mut conn)
            .map_err(|e| ChatLogRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_session(
        &self,
        session: &str,
    ) -> Result<Vec<ChatTurn>, ChatLogRepositoryError> {
        let mut conn = self.connection()?;

        let models = application_logs
            .filter(session_id.eq(session))
            .order((created_at.asc(), id.asc()))
            .select(ChatLogModel::as_select())
            .load(&mut conn)
            .map_err(|e| ChatLogRepositoryError::DatabaseError(e.to_string()))?;

        models
            .into_iter()
            .map(|row| ChatTurn::try_from(row).map_err(ChatLogRepositoryError::ValidationError))
            .collect()
    }
}
