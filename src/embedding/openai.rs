//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{Result, TariffError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::Client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder using the default model.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(api_key, &EmbeddingSettings::default())
    }

    /// Create an embedder with the configured model and dimensions.
    pub fn with_config(api_key: &str, settings: &EmbeddingSettings) -> Result<Self> {
        Ok(Self::with_client(create_client(api_key)?, settings))
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client<OpenAIConfig>, settings: &EmbeddingSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            dimensions: settings.dimensions as usize,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::String(text.to_string()))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| TariffError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| TariffError::OpenAI(format!("Embedding API error: {}", e)))?;

        let embedding = response
            .data
            .into_iter()
            .min_by_key(|e| e.index)
            .map(|e| e.embedding)
            .ok_or_else(|| TariffError::Embedding("Empty embedding response".to_string()))?;

        debug!("Generated embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::build_client;
    use std::time::Duration;

    #[test]
    fn test_embedder_creation() {
        let embedder = OpenAIEmbedder::new("sk-test").unwrap();
        assert_eq!(embedder.dimensions(), 1536);
        assert_eq!(embedder.model(), "text-embedding-3-small");

        let settings = EmbeddingSettings {
            model: "text-embedding-3-large".to_string(),
            dimensions: 3072,
        };
        let embedder = OpenAIEmbedder::with_config("sk-test", &settings).unwrap();
        assert_eq!(embedder.dimensions(), 3072);
    }

    #[tokio::test]
    async fn test_rate_limit_fails_on_first_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error": {"message": "Rate limit reached", "type": "requests", "param": null, "code": "rate_limit_exceeded"}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let config = OpenAIConfig::new()
            .with_api_key("sk-test")
            .with_api_base(server.url());
        let client = build_client(config, Duration::from_secs(5)).unwrap();
        let embedder = OpenAIEmbedder::with_client(client, &EmbeddingSettings::default());

        let err = tokio::time::timeout(Duration::from_secs(5), embedder.embed("leather boots"))
            .await
            .expect("rate-limited request was still pending")
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, TariffError::OpenAI(_)));
    }
}
