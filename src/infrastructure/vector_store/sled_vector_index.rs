use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sled::Db;
use uuid::Uuid;

use crate::application::ports::VectorIndex;
use crate::application::ports::embedding_provider::EmbeddingProvider;
use crate::application::ports::vector_index::{ScoredChunk, VectorIndexError};
use crate::domain::entities::{ChunkMetadata, DocumentChunk};

/// On-disk record. Keys are `file_id` (big endian) followed by the chunk
/// uuid, so every chunk of a file shares a key prefix.
#[derive(Debug, Serialize, Deserialize)]
struct StoredChunk {
    id: Uuid,
    text: String,
    metadata: ChunkMetadata,
    embedding: Vec<f32>,
}

impl StoredChunk {
    fn into_chunk(self) -> DocumentChunk {
        DocumentChunk::restore(self.id, self.text, self.metadata)
    }
}

pub struct SledVectorIndex {
    db: Db,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl SledVectorIndex {
    pub fn open(
        path: impl AsRef<Path>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, VectorIndexError> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(|e| {
            VectorIndexError::StorageError(format!(
                "Failed to create vector store directory {}: {}",
                path.display(),
                e
            ))
        })?;

        let db = sled::open(path)
            .map_err(|e| VectorIndexError::StorageError(format!("Failed to open vector store: {}", e)))?;

        tracing::info!(
            "Vector index opened at {} ({} chunks, embeddings from {})",
            path.display(),
            db.len(),
            embedding_provider.model_info()
        );

        Ok(Self {
            db,
            embedding_provider,
        })
    }

    /// In-memory index removed on drop.
    #[cfg(test)]
    pub fn temporary(embedding_provider: Arc<dyn EmbeddingProvider>) -> Result<Self, VectorIndexError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| VectorIndexError::StorageError(format!("Failed to open vector store: {}", e)))?;

        Ok(Self {
            db,
            embedding_provider,
        })
    }

    fn chunk_key(file_id: i32, chunk_id: Uuid) -> Vec<u8> {
        let mut key = Vec::with_capacity(20);
        key.extend_from_slice(&file_id.to_be_bytes());
        key.extend_from_slice(chunk_id.as_bytes());
        key
    }

    async fn embed_all(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, VectorIndexError> {
        let batch_size = self.embedding_provider.max_batch_size().max(1);
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(batch_size) {
            let response = self
                .embedding_provider
                .embed_batch(batch)
                .await
                .map_err(|e| VectorIndexError::EmbeddingError(e.to_string()))?;

            if response.embeddings.len() != batch.len() {
                return Err(VectorIndexError::EmbeddingError(format!(
                    "Expected {} embeddings, received {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            tracing::debug!(
                "Embedded {} texts with {} ({:?} tokens)",
                batch.len(),
                response.model_name,
                response.total_tokens
            );
            embeddings.extend(response.embeddings);
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl VectorIndex for SledVectorIndex {
    async fn add_chunks(&self, chunks: &[DocumentChunk]) -> Result<usize, VectorIndexError> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts = chunks.iter().map(|c| c.text().to_string()).collect();
        let embeddings = self.embed_all(texts).await?;

        let mut batch = sled::Batch::default();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            let record = StoredChunk {
                id: chunk.id(),
                text: chunk.text().to_string(),
                metadata: chunk.metadata().clone(),
                embedding,
            };
            let value = bincode::serialize(&record).map_err(|e| {
                VectorIndexError::SerializationError(format!("Failed to serialize chunk: {}", e))
            })?;
            batch.insert(Self::chunk_key(chunk.file_id(), chunk.id()), value);
        }

        self.db
            .apply_batch(batch)
            .map_err(|e| VectorIndexError::StorageError(format!("Failed to store chunks: {}", e)))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| VectorIndexError::StorageError(format!("Failed to flush: {}", e)))?;

        tracing::info!("Indexed {} chunks", chunks.len());
        Ok(chunks.len())
    }

    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorIndexError> {
        if k == 0 || self.db.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedding_provider
            .embed_query(query)
            .await
            .map_err(|e| VectorIndexError::EmbeddingError(e.to_string()))?;

        let mut results = Vec::new();
        for item in self.db.iter() {
            let (_, value) =
                item.map_err(|e| VectorIndexError::StorageError(format!("Database error: {}", e)))?;
            let record: StoredChunk = bincode::deserialize(&value).map_err(|e| {
                VectorIndexError::SerializationError(format!("Failed to deserialize chunk: {}", e))
            })?;

            let score = cosine_similarity(&query_embedding, &record.embedding);
            results.push(ScoredChunk {
                chunk: record.into_chunk(),
                score,
            });
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    async fn delete_by_file_id(&self, file_id: i32) -> Result<usize, VectorIndexError> {
        let mut batch = sled::Batch::default();
        let mut removed = 0;

        for item in self.db.scan_prefix(file_id.to_be_bytes()) {
            let (key, _) =
                item.map_err(|e| VectorIndexError::StorageError(format!("Database error: {}", e)))?;
            batch.remove(key);
            removed += 1;
        }

        if removed == 0 {
            return Ok(0);
        }

        self.db
            .apply_batch(batch)
            .map_err(|e| VectorIndexError::StorageError(format!("Failed to delete chunks: {}", e)))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| VectorIndexError::StorageError(format!("Failed to flush: {}", e)))?;

        tracing::info!("Removed {} chunks for file_id {}", removed, file_id);
        Ok(removed)
    }

    #[cfg(test)]
    async fn count_by_file_id(&self, file_id: i32) -> Result<usize, VectorIndexError> {
        let mut count = 0;
        for item in self.db.scan_prefix(file_id.to_be_bytes()) {
            item.map_err(|e| VectorIndexError::StorageError(format!("Database error: {}", e)))?;
            count += 1;
        }
        Ok(count)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let vec_a = DVector::from_vec(a.to_vec());
    let vec_b = DVector::from_vec(b.to_vec());

    let norm_a = vec_a.norm();
    let norm_b = vec_b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        vec_a.dot(&vec_b) / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeEmbeddingProvider;

    fn chunk(file_id: i32, text: &str, index: i32) -> DocumentChunk {
        DocumentChunk::new(
            text.to_string(),
            ChunkMetadata {
                file_id,
                source: format!("file{}.html", file_id),
                page: None,
                chunk_index: index,
            },
        )
    }

    fn index() -> SledVectorIndex {
        SledVectorIndex::temporary(Arc::new(FakeEmbeddingProvider::new())).unwrap()
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 0.001);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_ranks_and_limits() {
        let index = index();
        index
            .add_chunks(&[
                chunk(1, "aaaa aaaa", 0),
                chunk(1, "zzzz zzzz", 1),
                chunk(2, "aaaa bbbb", 0),
            ])
            .await
            .unwrap();

        let results = index.similarity_search("aaa", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text(), "aaaa aaaa");
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[1].chunk.text(), "aaaa bbbb");
        assert_eq!(results[1].chunk.metadata().source, "file2.html");
    }

    #[tokio::test]
    async fn test_search_on_empty_index() {
        let index = index();
        assert!(index.similarity_search("anything", 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_only_touches_one_file() {
        let index = index();
        index
            .add_chunks(&[chunk(1, "one", 0), chunk(1, "two", 1), chunk(256, "three", 0)])
            .await
            .unwrap();

        assert_eq!(index.count_by_file_id(1).await.unwrap(), 2);
        assert_eq!(index.delete_by_file_id(1).await.unwrap(), 2);
        assert_eq!(index.count_by_file_id(1).await.unwrap(), 0);
        assert_eq!(index.count_by_file_id(256).await.unwrap(), 1);

        // Deleting again is a no-op.
        assert_eq!(index.delete_by_file_id(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_stores_nothing() {
        let index = SledVectorIndex::temporary(Arc::new(FakeEmbeddingProvider::failing())).unwrap();

        let result = index.add_chunks(&[chunk(3, "text", 0)]).await;

        assert!(matches!(result, Err(VectorIndexError::EmbeddingError(_))));
        assert_eq!(index.count_by_file_id(3).await.unwrap(), 0);
    }
}
