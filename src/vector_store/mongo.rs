//! MongoDB Atlas vector search backend.

use super::{HtsMatch, SearchParams, VectorStore};
use crate::config::VectorStoreSettings;
use crate::error::{Result, TariffError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, instrument};

/// Vector store backed by an Atlas `$vectorSearch` index.
pub struct MongoVectorStore {
    collection: Collection<Document>,
    settings: VectorStoreSettings,
}

impl MongoVectorStore {
    /// Open a client for `uri`. The driver connects lazily on first use.
    pub async fn connect(uri: &str, settings: VectorStoreSettings) -> Result<Self> {
        let client = Client::with_options(client_options(uri).await?)?;
        Ok(Self::with_client(&client, settings))
    }

    /// Build from an existing client handle.
    pub fn with_client(client: &Client, settings: VectorStoreSettings) -> Self {
        let collection = client
            .database(&settings.database)
            .collection::<Document>(&settings.collection);
        Self {
            collection,
            settings,
        }
    }
}

#[async_trait]
impl VectorStore for MongoVectorStore {
    #[instrument(skip(self, query_embedding), fields(index = %self.settings.index, limit = params.limit))]
    async fn search(&self, query_embedding: &[f32], params: &SearchParams) -> Result<Vec<HtsMatch>> {
        let pipeline = build_pipeline(&self.settings, query_embedding, params);
        let mut cursor = self.collection.aggregate(pipeline).await?;

        let mut matches = Vec::with_capacity(params.limit as usize);
        while let Some(document) = cursor.try_next().await? {
            matches.push(match_from_document(&document, &self.settings.content_field)?);
        }

        debug!("Vector search returned {} matches", matches.len());
        Ok(matches)
    }
}

/// Driver options for `uri`. Each search is sent once; a failed aggregate is
/// reported, not replayed.
async fn client_options(uri: &str) -> Result<ClientOptions> {
    let mut options = ClientOptions::parse(uri).await?;
    options.retry_reads = Some(false);
    options.app_name.get_or_insert_with(|| "tariff-mcp".to_string());
    Ok(options)
}

/// Aggregation pipeline for a single nearest-neighbor query.
fn build_pipeline(
    settings: &VectorStoreSettings,
    query_embedding: &[f32],
    params: &SearchParams,
) -> Vec<Document> {
    let mut projection = doc! {
        "_id": 0,
        "score": { "$meta": "vectorSearchScore" },
    };
    projection.insert(settings.content_field.clone(), 1);

    vec![
        doc! {
            "$vectorSearch": {
                "index": settings.index.as_str(),
                "path": settings.path.as_str(),
                "queryVector": query_embedding.to_vec(),
                "numCandidates": i64::from(params.num_candidates),
                "limit": i64::from(params.limit),
            }
        },
        doc! { "$project": projection },
    ]
}

fn match_from_document(document: &Document, content_field: &str) -> Result<HtsMatch> {
    let content = document.get_str(content_field).map_err(|e| {
        TariffError::VectorStore(format!("match has no text field '{}': {}", content_field, e))
    })?;

    Ok(HtsMatch {
        content: content.to_string(),
        score: document.get_f64("score").ok().map(|s| s as f32),
    })
}
