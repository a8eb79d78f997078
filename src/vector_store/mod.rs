//! Vector store abstraction for HTS code lookup.
//!
//! The production backend is a MongoDB Atlas collection with a vector search
//! index. An in-memory store with exact cosine ranking is kept for tests and
//! offline experiments.

mod memory;
mod mongo;

pub use memory::MemoryVectorStore;
pub use mongo::MongoVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Parameters for a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Approximate neighbors considered before ranking.
    pub num_candidates: u32,
    /// Matches returned.
    pub limit: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            num_candidates: 100,
            limit: 5,
        }
    }
}

/// A single match returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct HtsMatch {
    /// Text payload, expected to hold an HTS-8 code and its description.
    pub content: String,
    /// Similarity score reported by the store, if any.
    pub score: Option<f32>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return the nearest documents to `query_embedding`, best first.
    async fn search(&self, query_embedding: &[f32], params: &SearchParams) -> Result<Vec<HtsMatch>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
