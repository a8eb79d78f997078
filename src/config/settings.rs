//! Configuration settings for tariff-mcp.
//!
//! Tuning knobs live in an optional TOML file. Secrets and endpoints come
//! from the environment instead, see [`super::Environment`].

use crate::error::TariffError;
use crate::vector_store::SearchParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Most matches a lookup may return.
pub const MAX_LIMIT: u32 = 5;

/// Upper bound Atlas accepts for `numCandidates`.
pub const MAX_NUM_CANDIDATES: u32 = 10_000;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub tariff_api: TariffApiSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use. Must match the model the index was built with.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector store settings (MongoDB Atlas vector search).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Database holding the HTS code collection.
    pub database: String,
    /// Collection of HTS-8 documents.
    pub collection: String,
    /// Name of the Atlas vector search index.
    pub index: String,
    /// Document field holding the embedding vector.
    pub path: String,
    /// Document field holding the text payload.
    pub content_field: String,
    /// Approximate neighbors considered per query.
    pub num_candidates: u32,
    /// Matches returned per query.
    pub limit: u32,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            database: "Tariff".to_string(),
            collection: "HTS_codes".to_string(),
            index: "hts8".to_string(),
            path: "embedding".to_string(),
            content_field: "page_content".to_string(),
            num_candidates: 100,
            limit: 5,
        }
    }
}

impl VectorStoreSettings {
    /// Search parameters for each lookup.
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            num_candidates: self.num_candidates,
            limit: self.limit,
        }
    }
}

/// External tariff calculation API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffApiSettings {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for TariffApiSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
        }
    }
}

impl TariffApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Reject values the vector index or the tariff client cannot work with.
    pub fn validate(&self) -> crate::error::Result<()> {
        let store = &self.vector_store;
        if store.limit == 0 || store.limit > MAX_LIMIT {
            return Err(TariffError::Config(format!(
                "vector_store.limit must be between 1 and {}, got {}",
                MAX_LIMIT, store.limit
            )));
        }
        if store.num_candidates < store.limit || store.num_candidates > MAX_NUM_CANDIDATES {
            return Err(TariffError::Config(format!(
                "vector_store.num_candidates must be between limit ({}) and {}, got {}",
                store.limit, MAX_NUM_CANDIDATES, store.num_candidates
            )));
        }
        if self.tariff_api.timeout_seconds == 0 {
            return Err(TariffError::Config(
                "tariff_api.timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tariff-mcp")
            .join("config.toml")
    }
}
