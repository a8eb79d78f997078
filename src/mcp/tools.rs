//! Tool dispatch table for the tariff MCP server.
//!
//! Each tool pairs a definition (name, description, input schema) with a
//! handler. The table knows nothing about transports.

use super::protocol::Tool;
use crate::error::{Result, TariffError};
use crate::lookup::HtsLookup;
use crate::tariff::{TariffArgs, TariffClient, TariffRequest};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const FIND_HTS8: &str = "find_hts8";
pub const CALCULATE_TARIFF: &str = "calculate_tariff";

/// What a tool hands back on success.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Json(Value),
}

/// A callable tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn definition(&self) -> Tool;

    async fn call(&self, arguments: Value) -> Result<ToolOutput>;
}

/// `find_hts8`: semantic HTS-8 lookup.
pub struct FindHts8Tool {
    lookup: HtsLookup,
}

impl FindHts8Tool {
    pub fn new(lookup: HtsLookup) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl ToolHandler for FindHts8Tool {
    fn definition(&self) -> Tool {
        Tool {
            name: FIND_HTS8.to_string(),
            description: "Search HTS codes from natural language (e.g., 'men leather shoes'). \
                Returns the page content of the closest matches, one per line, each with \
                its HTS-8 code and description."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Natural language description of the product"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, arguments: Value) -> Result<ToolOutput> {
        let query = arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| TariffError::InvalidInput("Missing 'query' argument".to_string()))?;

        let content = self.lookup.search(query).await?;
        Ok(ToolOutput::Text(content))
    }
}

/// `calculate_tariff`: validate inputs and call the tariff API.
pub struct CalculateTariffTool {
    client: TariffClient,
}

impl CalculateTariffTool {
    pub fn new(client: TariffClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for CalculateTariffTool {
    fn definition(&self) -> Tool {
        Tool {
            name: CALCULATE_TARIFF.to_string(),
            description: "Validate inputs and call the tariff calculation API. \
                Returns the duty/tax breakdown together with the normalized inputs."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "hts8": {
                        "type": "string",
                        "description": "8-digit HTS code (digits only)"
                    },
                    "itemValue": {
                        "type": "number",
                        "description": "Customs value in destination currency"
                    },
                    "itemQuantity": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Quantity, at least 1"
                    },
                    "originCountry": {
                        "type": "string",
                        "description": "ISO 3166-1 alpha-2 code (e.g., CN)"
                    },
                    "countryOfArrival": {
                        "type": "string",
                        "description": "ISO 3166-1 alpha-2 code (e.g., US)"
                    },
                    "modeOfTransport": {
                        "type": "string",
                        "enum": ["air", "sea", "land"],
                        "description": "One of air, sea, land"
                    },
                    "entryDate": {
                        "type": "string",
                        "description": "Date in YYYY-MM-DD format"
                    },
                    "loadingDate": {
                        "type": "string",
                        "description": "Date in YYYY-MM-DD format"
                    }
                },
                "required": [
                    "hts8", "itemValue", "itemQuantity", "originCountry",
                    "countryOfArrival", "modeOfTransport", "entryDate", "loadingDate"
                ]
            }),
        }
    }

    async fn call(&self, arguments: Value) -> Result<ToolOutput> {
        let args: TariffArgs = serde_json::from_value(arguments)
            .map_err(|e| TariffError::InvalidInput(format!("Invalid arguments: {}", e)))?;
        let request = TariffRequest::validate(args)?;

        let calculation = self.client.calculate(&request).await?;
        Ok(ToolOutput::Json(serde_json::to_value(calculation)?))
    }
}

/// Name to handler table.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two tariff tools.
    pub fn tariff_tools(lookup: HtsLookup, client: TariffClient) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FindHts8Tool::new(lookup)));
        registry.register(Arc::new(CalculateTariffTool::new(client)));
        registry
    }

    /// Register a handler under its definition's name, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        self.tools.insert(handler.definition().name, handler);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).cloned()
    }

    pub fn definitions(&self) -> Vec<Tool> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }
}
