use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::domain::entities::UploadedFile;
use crate::infrastructure::database::schema::document_store;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = document_store)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentRecordModel {
    pub id: i32,
    pub filename: String,
    pub upload_timestamp: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = document_store)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewDocumentRecordModel<'a> {
    pub filename: &'a str,
    pub upload_timestamp: NaiveDateTime,
}

impl From<DocumentRecordModel> for UploadedFile {
    fn from(model: DocumentRecordModel) -> Self {
        UploadedFile::new(model.id, model.filename, model.upload_timestamp)
    }
}
