//! Newline-delimited JSON-RPC over stdin/stdout.

use super::server::McpServer;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

/// Serve on the process's stdin and stdout. Logging must go to stderr.
pub async fn serve_stdio(server: McpServer) -> anyhow::Result<()> {
    info!("Tariff MCP server starting (stdio transport)");
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve_lines(&server, stdin, stdout).await
}

/// Read one request per line until EOF, writing one response per line.
pub async fn serve_lines<R, W>(server: &McpServer, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = server.handle_message(&line).await {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }

    Ok(())
}
