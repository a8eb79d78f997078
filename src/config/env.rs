//! Required environment configuration.
//!
//! Every value here is checked before the server is built. A missing value
//! aborts startup with an error naming the variable.

use crate::error::{Result, TariffError};
use url::Url;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const MONGODB_URI: &str = "MONGODB_URI";
pub const TARIFF_API_URL: &str = "TARIFF_API_URL";
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";

/// Variables every transport needs.
pub const REQUIRED_VARS: [&str; 3] = [OPENAI_API_KEY, MONGODB_URI, TARIFF_API_URL];

/// Credentials and endpoints for the downstream collaborators.
#[derive(Clone)]
pub struct Environment {
    pub openai_api_key: String,
    pub mongodb_uri: String,
    pub tariff_api_url: Url,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("mongodb_uri", &"<redacted>")
            .field("tariff_api_url", &self.tariff_api_url.as_str())
            .finish()
    }
}

impl Environment {
    /// Read the environment, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = require(&lookup, OPENAI_API_KEY)?;
        let mongodb_uri = require(&lookup, MONGODB_URI)?;
        let raw_url = require(&lookup, TARIFF_API_URL)?;
        let tariff_api_url = Url::parse(&raw_url).map_err(|e| {
            TariffError::Config(format!("{} is not a valid URL ({}): {}", TARIFF_API_URL, e, raw_url))
        })?;

        Ok(Self {
            openai_api_key,
            mongodb_uri,
            tariff_api_url,
        })
    }
}

/// Host and port for the network transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindAddress {
    pub host: String,
    pub port: u16,
}

impl BindAddress {
    /// Resolve from CLI overrides, falling back to `HOST` and `PORT`.
    pub fn resolve(host: Option<String>, port: Option<u16>) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::resolve_with(host, port, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(host: Option<String>, port: Option<u16>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match host {
            Some(h) if !h.trim().is_empty() => h,
            _ => require(&lookup, HOST)?,
        };

        let port = match port {
            Some(p) => p,
            None => {
                let raw = require(&lookup, PORT)?;
                raw.trim().parse::<u16>().map_err(|_| {
                    TariffError::Config(format!("{} must be a port number, got '{}'", PORT, raw))
                })?
            }
        };

        Ok(Self { host, port })
    }
}

impl std::fmt::Display for BindAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(TariffError::MissingConfig(key.to_string())),
    }
}

/// Mask a secret for display, keeping a short prefix and suffix.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
