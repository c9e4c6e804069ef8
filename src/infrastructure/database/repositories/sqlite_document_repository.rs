use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::entities::UploadedFile;
use crate::domain::repositories::{
    DocumentRepository, document_repository::DocumentRepositoryError,
};
use crate::infrastructure::database::get_database_connection;
use crate::infrastructure::database::models::{DocumentRecordModel, NewDocumentRecordModel};
use crate::infrastructure::database::schema::document_store::dsl::*;

pub struct SqliteDocumentRepository {
    database_url: String,
}

impl SqliteDocumentRepository {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    fn connection(&self) -> Result<SqliteConnection, DocumentRepositoryError> {
        get_database_connection(&self.database_url)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl DocumentRepository for SqliteDocumentRepository {
    async fn insert(
        &self,
        name: &str,
        timestamp: NaiveDateTime,
    ) -> Result<i32, DocumentRepositoryError> {
        if name.trim().is_empty() {
            return Err(DocumentRepositoryError::ValidationError(
                "Filename cannot be empty".to_string(),
            ));
        }

        let mut conn = self.connection()?;

        let new_record = NewDocumentRecordModel {
            filename: name,
            upload_timestamp: timestamp,
        };

        let inserted: DocumentRecordModel = diesel::insert_into(document_store)
            .values(&new_record)
            .returning(DocumentRecordModel::as_returning())
            .get_result(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Ok(inserted.id)
    }

    async fn find_all(&self) -> Result<Vec<UploadedFile>, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        let models = document_store
            .order((upload_timestamp.desc(), id.desc()))
            .select(DocumentRecordModel::as_select())
            .load(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Ok(models.into_iter().map(UploadedFile::from).collect())
    }

    async fn delete(&self, file_id: i32) -> Result<bool, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        let deleted_count = diesel::delete(document_store.find(file_id))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::initialize_database;
    use chrono::{Duration, Utc};

    fn repository() -> (tempfile::TempDir, SqliteDocumentRepository) {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("docs.db").to_string_lossy().to_string();
        initialize_database(&url).unwrap();
        (dir, SqliteDocumentRepository::new(url))
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let (_dir, repo) = repository();
        let now = Utc::now().naive_utc();

        let first = repo.insert("a.pdf", now).await.unwrap();
        let second = repo.insert("b.pdf", now).await.unwrap();

        assert!(second > first);
        let all = repo.find_all().await.unwrap();
        let found = all.iter().find(|f| f.id() == first).unwrap();
        assert_eq!(found.filename(), "a.pdf");
        assert_eq!(found.upload_timestamp(), now);
    }

    #[tokio::test]
    async fn test_find_all_is_newest_first() {
        let (_dir, repo) = repository();
        let now = Utc::now().naive_utc();

        repo.insert("old.html", now - Duration::hours(1)).await.unwrap();
        repo.insert("new.docx", now).await.unwrap();
        let tied = repo.insert("tied.pdf", now).await.unwrap();

        let files = repo.find_all().await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename()).collect();

        assert_eq!(names, vec!["tied.pdf", "new.docx", "old.html"]);
        assert_eq!(files[0].id(), tied);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, repo) = repository();
        let file_id = repo.insert("gone.pdf", Utc::now().naive_utc()).await.unwrap();

        assert!(repo.delete(file_id).await.unwrap());
        assert!(!repo.delete(file_id).await.unwrap());
        assert!(!repo.delete(9999).await.unwrap());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_database_reports_error() {
        let repo = SqliteDocumentRepository::new("/nonexistent-dir/sub/db.sqlite");
        assert!(matches!(
            repo.find_all().await,
            Err(DocumentRepositoryError::DatabaseError(_))
        ));
    }
}
