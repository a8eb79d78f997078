//! Configuration module for tariff-mcp.
//!
//! Handles TOML tuning settings and the required environment.

mod env;
mod settings;

pub use env::{mask, BindAddress, Environment, HOST, MONGODB_URI, OPENAI_API_KEY, PORT, REQUIRED_VARS, TARIFF_API_URL};
pub use settings::{
    EmbeddingSettings, GeneralSettings, Settings, TariffApiSettings, VectorStoreSettings,
};
