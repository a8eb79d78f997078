//! HTTP transports for the MCP server.
//!
//! - `POST /mcp`: one JSON-RPC request in, one response out.
//! - `GET /sse` + `POST /messages?session_id=..`: the SSE transport. The
//!   stream's first `endpoint` event tells the client where to post; each
//!   response is pushed back as a `message` event.

use super::server::McpServer;
use crate::config::BindAddress;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    routing::{get, post},
    Json, Router,
};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use uuid::Uuid;

type Sessions = Arc<Mutex<HashMap<Uuid, mpsc::UnboundedSender<String>>>>;

/// Shared router state.
#[derive(Clone)]
struct HttpState {
    server: McpServer,
    sessions: Sessions,
}

/// Build the router.
pub fn router(server: McpServer) -> Router {
    let state = HttpState {
        server,
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/mcp", post(rpc))
        .route("/sse", get(sse))
        .route("/messages", post(messages))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve_http(server: McpServer, addr: &BindAddress) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr.to_string()).await?;
    info!("Starting MCP server on {} (SSE transport)", addr);

    axum::serve(listener, router(server))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn rpc(State(state): State<HttpState>, body: Bytes) -> Response {
    let raw = String::from_utf8_lossy(&body);
    match state.server.handle_message(&raw).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Removes the session when the SSE stream is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(&self.id);
        }
        debug!("SSE session {} closed", self.id);
    }
}

async fn sse(State(state): State<HttpState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    if let Ok(mut sessions) = state.sessions.lock() {
        sessions.insert(id, tx);
    }
    debug!("SSE session {} opened", id);

    let guard = SessionGuard {
        id,
        sessions: state.sessions.clone(),
    };

    let endpoint = futures::stream::once(async move {
        Ok::<_, Infallible>(Event::default()
            .event("endpoint")
            .data(format!("/messages?session_id={}", id)))
    });

    let messages = futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let message = rx.recv().await?;
        let event = Event::default().event("message").data(message);
        Some((Ok::<_, Infallible>(event), (rx, guard)))
    });

    Sse::new(endpoint.chain(messages)).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: Uuid,
}

async fn messages(
    State(state): State<HttpState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let sender = state
        .sessions
        .lock()
        .ok()
        .and_then(|sessions| sessions.get(&query.session_id).cloned());

    let Some(sender) = sender else {
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    if sender.is_closed() {
        return (StatusCode::GONE, "Session closed").into_response();
    }

    // The response is delivered on the stream once the call finishes.
    let raw = String::from_utf8_lossy(&body).into_owned();
    let session_id = query.session_id;
    tokio::spawn(async move {
        let Some(response) = state.server.handle_message(&raw).await else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(encoded) => {
                if sender.send(encoded).is_err() {
                    debug!("Session {} closed before its response was ready", session_id);
                }
            }
            Err(e) => warn!("Failed to encode response for session {}: {}", session_id, e),
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::mcp::protocol::Tool;
    use crate::mcp::tools::{ToolHandler, ToolOutput, ToolRegistry};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body, BodyDataStream};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    /// Holds every call until the test releases it.
    struct GatedTool {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ToolHandler for GatedTool {
        fn definition(&self) -> Tool {
            Tool {
                name: "gated".to_string(),
                description: "Waits for the gate".to_string(),
                input_schema: json!({"type": "object"}),
            }
        }

        async fn call(&self, _arguments: Value) -> Result<ToolOutput> {
            self.gate.notified().await;
            Ok(ToolOutput::Text("released".to_string()))
        }
    }

    async fn open_session(app: &Router) -> (BodyDataStream, String) {
        let response = app
            .clone()
            .oneshot(Request::get("/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut stream = response.into_body().into_data_stream();
        let first = String::from_utf8(stream.next().await.unwrap().unwrap().to_vec()).unwrap();
        assert!(first.contains("event: endpoint"));
        let path = first
            .lines()
            .find_map(|l| l.strip_prefix("data: "))
            .unwrap()
            .to_string();
        (stream, path)
    }

    fn app() -> Router {
        router(McpServer::new(ToolRegistry::new()))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_rpc_endpoint() {
        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["id"], 9);
        assert_eq!(body["result"], json!({}));
    }

    #[tokio::test]
    async fn test_rpc_notification_accepted() {
        let request = Request::post("/mcp")
            .body(Body::from(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_messages_unknown_session() {
        let uri = format!("/messages?session_id={}", Uuid::new_v4());
        let request = Request::post(uri)
            .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sse_session_roundtrip() {
        let app = app();
        let (mut stream, path) = open_session(&app).await;
        assert!(path.starts_with("/messages?session_id="));

        let post = Request::post(path)
            .body(Body::from(r#"{"jsonrpc":"2.0","id":42,"method":"ping"}"#))
            .unwrap();
        let accepted = app.oneshot(post).await.unwrap();
        assert_eq!(accepted.status(), StatusCode::ACCEPTED);

        let second = String::from_utf8(stream.next().await.unwrap().unwrap().to_vec()).unwrap();
        assert!(second.contains("event: message"));
        let data = second.lines().find_map(|l| l.strip_prefix("data: ")).unwrap();
        let message: Value = serde_json::from_str(data).unwrap();
        assert_eq!(message["id"], 42);
    }

    #[tokio::test]
    async fn test_messages_accepted_before_tool_finishes() {
        let gate = Arc::new(Notify::new());
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(GatedTool { gate: gate.clone() }));
        let app = router(McpServer::new(registry));

        let (mut stream, path) = open_session(&app).await;

        let post = Request::post(path)
            .body(Body::from(
                r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"gated"}}"#,
            ))
            .unwrap();
        let accepted = tokio::time::timeout(std::time::Duration::from_secs(1), app.oneshot(post))
            .await
            .expect("POST waited for the tool call")
            .unwrap();
        assert_eq!(accepted.status(), StatusCode::ACCEPTED);

        gate.notify_one();

        let event = String::from_utf8(stream.next().await.unwrap().unwrap().to_vec()).unwrap();
        let data = event.lines().find_map(|l| l.strip_prefix("data: ")).unwrap();
        let message: Value = serde_json::from_str(data).unwrap();
        assert_eq!(message["id"], 7);
        assert_eq!(message["result"]["content"][0]["text"], "released");
    }
}
