//! Process-wide service handles.
//!
//! Everything here is built once at startup and shared read-only by every
//! tool invocation.

use crate::config::{Environment, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::lookup::HtsLookup;
use crate::mcp::{McpServer, ToolRegistry};
use crate::tariff::TariffClient;
use crate::vector_store::{MongoVectorStore, VectorStore};
use std::sync::Arc;
use tracing::info;

/// Long-lived collaborators injected into the tool handlers.
#[derive(Clone)]
pub struct App {
    lookup: HtsLookup,
    tariff: TariffClient,
}

impl App {
    /// Assemble from already-built collaborators.
    pub fn new(lookup: HtsLookup, tariff: TariffClient) -> Self {
        Self { lookup, tariff }
    }

    /// Build the production collaborators.
    pub async fn from_config(settings: &Settings, env: &Environment) -> Result<Self> {
        let embedder: Arc<dyn Embedder> =
            Arc::new(OpenAIEmbedder::with_config(&env.openai_api_key, &settings.embedding)?);

        let store: Arc<dyn VectorStore> = Arc::new(
            MongoVectorStore::connect(&env.mongodb_uri, settings.vector_store.clone()).await?,
        );

        let lookup = HtsLookup::new(embedder, store, settings.vector_store.search_params());
        let tariff = TariffClient::with_timeout(env.tariff_api_url.clone(), settings.tariff_api.timeout())?;

        info!(
            "Services ready (embedding model {}, index {}.{}/{}, tariff API {})",
            settings.embedding.model,
            settings.vector_store.database,
            settings.vector_store.collection,
            settings.vector_store.index,
            env.tariff_api_url
        );

        Ok(Self::new(lookup, tariff))
    }

    pub fn lookup(&self) -> &HtsLookup {
        &self.lookup
    }

    pub fn tariff(&self) -> &TariffClient {
        &self.tariff
    }

    pub fn tool_registry(&self) -> ToolRegistry {
        ToolRegistry::tariff_tools(self.lookup.clone(), self.tariff.clone())
    }

    pub fn mcp_server(&self) -> McpServer {
        McpServer::new(self.tool_registry())
    }
}
