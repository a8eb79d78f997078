//! Tariff MCP - HTS lookup and tariff calculation tools
//!
//! An MCP tool server for customs tariff questions. It gives a conversational
//! agent two tools:
//!
//! - `find_hts8` embeds a product description and returns the closest HTS-8
//!   codes from a MongoDB Atlas vector index
//! - `calculate_tariff` validates a shipment and forwards it to an external
//!   tariff calculation API, returning the breakdown with the normalized inputs
//!
//! # Architecture
//!
//! - `config` - TOML settings and the required environment
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `lookup` - Natural-language HTS lookup
//! - `tariff` - Request validation and the tariff API client
//! - `mcp` - JSON-RPC protocol, tool table and transports
//! - `app` - Startup wiring of the shared service handles
//!
//! # Example
//!
//! ```rust,no_run
//! use tariff_mcp::app::App;
//! use tariff_mcp::config::{Environment, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let env = Environment::from_env()?;
//!     let app = App::from_config(&Settings::load()?, &env).await?;
//!
//!     let candidates = app.lookup().search("men leather shoes").await?;
//!     println!("{}", candidates);
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod lookup;
pub mod mcp;
pub mod openai;
pub mod tariff;
pub mod vector_store;

pub use error::{Result, TariffError};
