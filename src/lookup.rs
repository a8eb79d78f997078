//! Natural-language HTS-8 lookup.
//!
//! Turns a product description into candidate tariff codes by embedding the
//! query and asking the vector store for its nearest documents.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{HtsMatch, SearchParams, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Vector lookup client shared by every `find_hts8` invocation.
#[derive(Clone)]
pub struct HtsLookup {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    params: SearchParams,
}

impl HtsLookup {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, params: SearchParams) -> Self {
        Self {
            embedder,
            store,
            params,
        }
    }

    /// Search for HTS-8 candidates matching `query`.
    ///
    /// A blank query returns an empty string without touching the embedding
    /// provider or the store. Otherwise each matched payload is emitted on
    /// its own line, in the order the store ranked them.
    #[instrument(skip(self), fields(query_len = query.len()))]
    pub async fn search(&self, query: &str) -> Result<String> {
        if query.trim().is_empty() {
            return Ok(String::new());
        }

        let embedding = self.embedder.embed(query).await?;
        let matches = self.store.search(&embedding, &self.params).await?;
        debug!("Found {} HTS candidates", matches.len());

        Ok(join_matches(&matches))
    }
}

fn join_matches(matches: &[HtsMatch]) -> String {
    let mut output = String::new();
    for m in matches {
        output.push_str(&m.content);
        output.push('\n');
    }
    output
}
