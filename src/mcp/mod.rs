//! MCP (Model Context Protocol) server exposing the tariff tools.
//!
//! Implements JSON-RPC 2.0 over stdio, a plain HTTP endpoint, and the SSE
//! transport.

mod http;
mod protocol;
mod server;
mod stdio;
mod tools;

pub use http::{router, serve_http};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Tool, ToolCallResult, ToolContent};
pub use server::{McpServer, PROTOCOL_VERSION, SERVER_INSTRUCTIONS};
pub use stdio::{serve_lines, serve_stdio};
pub use tools::{
    CalculateTariffTool, FindHts8Tool, ToolHandler, ToolOutput, ToolRegistry, CALCULATE_TARIFF,
    FIND_HTS8,
};
