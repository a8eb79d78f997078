//! Serve command - MCP over HTTP and SSE.

use crate::app::App;
use crate::cli::Output;
use crate::config::{BindAddress, Environment, Settings};
use crate::mcp::serve_http;
use anyhow::Result;

/// Run the HTTP tool server.
///
/// Configuration is checked in full before anything is bound.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> Result<()> {
    let env = Environment::from_env()?;
    let addr = BindAddress::resolve(host, port)?;
    let app = App::from_config(&settings, &env).await?;

    Output::header("Tariff MCP Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("JSON-RPC", "POST /mcp");
    Output::kv("SSE stream", "GET  /sse");
    Output::kv("SSE messages", "POST /messages?session_id=...");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    serve_http(app.mcp_server(), &addr).await
}
