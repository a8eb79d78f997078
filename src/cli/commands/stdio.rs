//! Stdio command - MCP over stdin/stdout.

use crate::app::App;
use crate::config::{Environment, Settings};
use crate::mcp::serve_stdio;
use anyhow::Result;

/// Run the MCP server on stdio. Nothing but JSON-RPC may reach stdout.
pub async fn run_stdio(settings: Settings) -> Result<()> {
    let env = Environment::from_env()?;
    let app = App::from_config(&settings, &env).await?;
    serve_stdio(app.mcp_server()).await
}
