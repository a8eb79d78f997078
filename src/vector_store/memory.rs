//! In-memory vector store implementation.
//!
//! Ranks by exact cosine similarity. Useful for testing and small datasets.

use super::{cosine_similarity, HtsMatch, SearchParams, VectorStore};
use crate::error::{Result, TariffError};
use async_trait::async_trait;
use std::sync::RwLock;

/// A document held by the in-memory store.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    pub content: String,
    pub embedding: Vec<f32>,
}

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<Vec<MemoryDocument>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Add a document with its embedding.
    pub fn insert(&self, content: impl Into<String>, embedding: Vec<f32>) -> Result<()> {
        let mut docs = self
            .documents
            .write()
            .map_err(|_| TariffError::VectorStore("memory store lock poisoned".to_string()))?;
        docs.push(MemoryDocument {
            content: content.into(),
            embedding,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn search(&self, query_embedding: &[f32], params: &SearchParams) -> Result<Vec<HtsMatch>> {
        let docs = self
            .documents
            .read()
            .map_err(|_| TariffError::VectorStore("memory store lock poisoned".to_string()))?;

        let mut results: Vec<HtsMatch> = docs
            .iter()
            .map(|doc| HtsMatch {
                content: doc.content.clone(),
                score: Some(cosine_similarity(query_embedding, &doc.embedding)),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(params.limit as usize);

        Ok(results)
    }
}
