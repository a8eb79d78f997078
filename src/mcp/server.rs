//! MCP server implementation.
//!
//! Transport independent: each transport feeds raw JSON-RPC messages in and
//! writes back whatever response comes out.

use super::protocol::*;
use super::tools::{ToolOutput, ToolRegistry};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "Tariff MCP Server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SERVER_INSTRUCTIONS: &str = "\
You are an MCP server exposing two tools to help with customs tariff computations.
Workflow:
1) If the user has only a natural-language description of goods, call `find_hts8(query)`
   to propose likely HTS-8 codes with titles/snippets. Confirm the HTS-8 code with the user
   before calling the calculate_tariff tool.
2) When (and only when) you have: hts8, itemValue, itemQuantity, originCountry,
   countryOfArrival, modeOfTransport, entryDate, and loadingDate, call `calculate_tariff(...)`.
Constraints:
- Countries must be ISO 3166-1 alpha-2 codes (e.g., US, CN, SG).
- modeOfTransport is one of air, sea, land.
Return concise, helpful summaries after calculations, including duty/tax totals and any notes.";

/// MCP server over a fixed tool table.
#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
            }
        };

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    &format!("Invalid request: {}", e),
                ))
            }
        };

        self.handle_request(request).await
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Notification received: {}", request.method);
            return None;
        }

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Only JSON-RPC 2.0 is supported",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: SERVER_INSTRUCTIONS.to_string(),
        };

        to_response(id, &result)
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.registry.definitions(),
        };
        to_response(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let result = self
            .call_tool(&params.name, params.arguments.unwrap_or_else(|| json!({})))
            .await;
        to_response(id, &result)
    }

    /// Run a tool by name. Failures come back as `isError` results.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolCallResult {
        let Some(tool) = self.registry.get(name) else {
            return ToolCallResult::error(format!("Unknown tool: {}", name));
        };

        info!("Calling tool {}", name);
        match tool.call(arguments).await {
            Ok(ToolOutput::Text(text)) => ToolCallResult::text(text),
            Ok(ToolOutput::Json(value)) => ToolCallResult::structured(value),
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                ToolCallResult::error(e.to_string())
            }
        }
    }
}

fn to_response<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &format!("Serialization failed: {}", e)),
    }
}
