use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A file accepted through the upload endpoint. The id is assigned by the
/// record store and tags every chunk derived from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    id: i32,
    filename: String,
    upload_timestamp: NaiveDateTime,
}

impl UploadedFile {
    pub fn new(id: i32, filename: String, upload_timestamp: NaiveDateTime) -> Self {
        Self {
            id,
            filename,
            upload_timestamp,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn upload_timestamp(&self) -> NaiveDateTime {
        self.upload_timestamp
    }
}
