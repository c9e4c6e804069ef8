use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::application::use_cases::upload_document::UploadDocumentResponse;
use crate::domain::entities::UploadedFile;

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentInfoDto {
    pub id: i32,
    pub filename: String,
    pub upload_timestamp: NaiveDateTime,
}

impl From<UploadedFile> for DocumentInfoDto {
    fn from(file: UploadedFile) -> Self {
        Self {
            id: file.id(),
            filename: file.filename().to_string(),
            upload_timestamp: file.upload_timestamp(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponseDto {
    pub message: String,
    pub file_id: i32,
}

impl From<UploadDocumentResponse> for UploadResponseDto {
    fn from(response: UploadDocumentResponse) -> Self {
        Self {
            message: format!(
                "File {} has been successfully uploaded and indexed.",
                response.file_name
            ),
            file_id: response.file_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteDocumentRequestDto {
    pub file_id: i32,
}
