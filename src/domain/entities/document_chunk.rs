use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata stored next to every indexed window of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_id: i32,
    pub source: String,
    pub page: Option<i32>,
    pub chunk_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    id: Uuid,
    text: String,
    metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(text: String, metadata: ChunkMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            metadata,
        }
    }

    pub fn restore(id: Uuid, text: String, metadata: ChunkMetadata) -> Self {
        Self { id, text, metadata }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &ChunkMetadata {
        &self.metadata
    }

    pub fn file_id(&self) -> i32 {
        self.metadata.file_id
    }
}
