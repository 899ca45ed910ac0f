//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests, plus the documentation
//! page. The router is composed from route tables every time it is built:
//! the documentation routes are placed in front of the protocol routes, and
//! the first entry for a given method and path wins.

use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{MethodRouter, get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, instrument, warn};

use super::docs::{DOCS_PATH, documentation_routes};
use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::INSTRUCTIONS;

/// Protocol version reported on initialize.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }
}

/// Application state shared across HTTP handlers.
///
/// The transport is stateless: every request is answered from the server
/// alone, so no per-client session is kept.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    pub(super) server: McpServer,
}

impl AppState {
    /// Create handler state around `server`.
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }
}

/// A single mountable route: a path, the method it answers, and its handler.
pub struct RouteEntry {
    pub path: String,
    pub method: Method,
    pub handler: MethodRouter<AppState>,
}

impl RouteEntry {
    /// Create a route entry.
    pub fn new(path: impl Into<String>, method: Method, handler: MethodRouter<AppState>) -> Self {
        Self {
            path: path.into(),
            method,
            handler,
        }
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Routes of the JSON-RPC surface.
pub fn protocol_routes(config: &HttpConfig) -> Vec<RouteEntry> {
    let rpc_path = config.rpc_path.clone();
    let info_rpc_path = rpc_path.clone();

    vec![
        RouteEntry::new(rpc_path, Method::POST, post(handle_rpc)),
        RouteEntry::new("/health", Method::GET, get(health_check)),
        RouteEntry::new(
            "/info",
            Method::GET,
            get(move |State(state): State<AppState>| info_handler(state, info_rpc_path.clone())),
        ),
    ]
}

/// Put `front` ahead of `base`, keeping only the first entry per method and path.
pub fn compose_routes(front: Vec<RouteEntry>, base: Vec<RouteEntry>) -> Vec<RouteEntry> {
    let mut seen = HashSet::new();
    front
        .into_iter()
        .chain(base)
        .filter(|entry| {
            let fresh = seen.insert((entry.method.clone(), entry.path.clone()));
            if !fresh {
                debug!("Route {:?} shadowed by an earlier entry", entry);
            }
            fresh
        })
        .collect()
}

/// Build the HTTP application.
///
/// Each call composes the route tables from scratch, so every router built
/// for this server carries the documentation routes.
pub fn build_router(config: &HttpConfig, state: AppState) -> Router {
    let routes = compose_routes(documentation_routes(), protocol_routes(config));
    debug!("Mounting routes: {:?}", routes);

    let mut app = routes
        .into_iter()
        .fold(Router::new(), |router, entry| {
            router.route(&entry.path, entry.handler)
        })
        .with_state(state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = build_router(&self.config, AppState::new(server));

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → Docs:     GET {}", DOCS_PATH);
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Server metadata, formerly served at the root.
async fn info_handler(state: AppState, rpc_path: String) -> impl IntoResponse {
    let engine = state.server.dispatcher().engine();
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "engine": {
            "name": engine.name(),
            "version": engine.version(),
        },
        "transport": "HTTP",
        "endpoints": {
            "docs": DOCS_PATH,
            "rpc": rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", &request.method);
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request);

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),
        "tools/list" => handle_tools_list(state, request),
        "tools/call" => handle_tools_call(state, request),

        // Notifications (no response needed for stateless HTTP)
        method if method.starts_with("notifications/") => {
            handle_notification(&request);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": INSTRUCTIONS
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let result = serde_json::json!({
        "tools": state.server.list_tools()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/call request.
fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    let arguments = match params.get("arguments") {
        None | Some(serde_json::Value::Null) => serde_json::Map::new(),
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(_) => {
            return JsonRpcResponse::invalid_params(request.id, "Arguments must be an object");
        }
    };

    match state.server.call_tool(name, &arguments) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::error(request.id, e.code.0, e.message),
    }
}

/// Handle notifications (no response needed).
fn handle_notification(request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => info!("Client initialized (protocol {})", PROTOCOL_VERSION),
        _ => debug!("Received notification: {}", request.method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state_with_docs(dir: &TempDir) -> AppState {
        let source = dir.path().join("README.md");
        let favicon = dir.path().join("favicon.ico");
        fs::write(&source, "# FortunaMCP\n\n| Tool | Result |\n|---|---|\n| dice | integer |\n").unwrap();
        fs::write(&favicon, [0u8, 0, 1, 0]).unwrap();

        let mut config = Config::default();
        config.docs.source_path = source;
        config.docs.favicon_path = favicon;
        AppState::new(McpServer::new(config).unwrap())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn rpc_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_docs_served_on_every_build() {
        let dir = TempDir::new().unwrap();
        let state = state_with_docs(&dir);
        let config = HttpConfig::default();
        let version = state.server.version().to_string();

        for _ in 0..2 {
            let app = build_router(&config, state.clone());
            let (status, body) = send(app, get_request("/")).await;
            assert_eq!(status, StatusCode::OK);
            let page = String::from_utf8(body).unwrap();
            assert!(page.contains("<table>"));
            assert!(page.contains(&format!("v{}", version)));
        }
    }

    #[tokio::test]
    async fn test_docs_missing_source_is_server_error() {
        let mut config = Config::default();
        config.docs.source_path = "/nonexistent/fortuna/README.md".into();
        let state = AppState::new(McpServer::new(config).unwrap());

        let app = build_router(&HttpConfig::default(), state);
        let (status, _) = send(app, get_request("/")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_favicon() {
        let dir = TempDir::new().unwrap();
        let app = build_router(&HttpConfig::default(), state_with_docs(&dir));
        let response = app.oneshot(get_request("/favicon.ico")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/x-icon");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), &[0u8, 0, 1, 0]);
    }

    #[tokio::test]
    async fn test_favicon_missing_is_not_found() {
        let mut config = Config::default();
        config.docs.favicon_path = "/nonexistent/fortuna/favicon.ico".into();
        let state = AppState::new(McpServer::new(config).unwrap());

        let app = build_router(&HttpConfig::default(), state);
        let (status, _) = send(app, get_request("/favicon.ico")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_protocol_routes_still_mounted() {
        let dir = TempDir::new().unwrap();
        let app = build_router(&HttpConfig::default(), state_with_docs(&dir));

        let (status, body) = send(app.clone(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "healthy");

        let (status, body) = send(app, get_request("/info")).await;
        assert_eq!(status, StatusCode::OK);
        let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(info["name"], "FortunaMCP");
        assert_eq!(info["endpoints"]["rpc"], "/mcp");
    }

    #[test]
    fn test_compose_routes_first_match_wins() {
        let front = vec![RouteEntry::new("/", Method::GET, get(|| async { "front" }))];
        let base = vec![
            RouteEntry::new("/", Method::GET, get(|| async { "base" })),
            RouteEntry::new("/", Method::POST, post(|| async { "post" })),
            RouteEntry::new("/health", Method::GET, get(|| async { "ok" })),
        ];

        let routes = compose_routes(front, base);
        let keys: Vec<_> = routes
            .iter()
            .map(|r| (r.method.clone(), r.path.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Method::GET, "/"),
                (Method::POST, "/"),
                (Method::GET, "/health"),
            ]
        );
    }

    #[tokio::test]
    async fn test_documentation_shadows_root() {
        let dir = TempDir::new().unwrap();
        let state = state_with_docs(&dir);
        let base = vec![RouteEntry::new("/", Method::GET, get(|| async { "shadowed" }))];

        let app = compose_routes(documentation_routes(), base)
            .into_iter()
            .fold(Router::new(), |router, entry| {
                router.route(&entry.path, entry.handler)
            })
            .with_state(state);

        let (status, body) = send(app, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(body, b"shadowed");
    }

    #[tokio::test]
    async fn test_rpc_tools_call() {
        let dir = TempDir::new().unwrap();
        let app = build_router(&HttpConfig::default(), state_with_docs(&dir));

        let (status, body) = send(
            app,
            rpc_request(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "dice", "arguments": {"rolls": 3, "sides": 6}}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let total = response["result"]["structuredContent"]["result"]
            .as_i64()
            .unwrap();
        assert!((3..=18).contains(&total));
    }

    #[tokio::test]
    async fn test_rpc_unknown_tool_is_invalid_params() {
        let dir = TempDir::new().unwrap();
        let app = build_router(&HttpConfig::default(), state_with_docs(&dir));

        let (_, body) = send(
            app,
            rpc_request(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {"name": "coin_flip", "arguments": {}}
            })),
        )
        .await;
        let response: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["error"]["code"], -32602);
    }

    #[test]
    fn test_rpc_initialize_and_list() {
        let dir = TempDir::new().unwrap();
        let state = state_with_docs(&dir);

        let init = process_request(
            &state,
            serde_json::from_value(serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize"
            }))
            .unwrap(),
        );
        let result = init.result.unwrap();
        assert_eq!(result["instructions"], INSTRUCTIONS);
        assert!(result["capabilities"].get("prompts").is_none());

        let list = process_request(
            &state,
            serde_json::from_value(serde_json::json!({
                "jsonrpc": "2.0", "id": 2, "method": "tools/list"
            }))
            .unwrap(),
        );
        assert_eq!(list.result.unwrap()["tools"].as_array().unwrap().len(), 23);
    }

    #[test]
    fn test_notifications_need_no_session() {
        let dir = TempDir::new().unwrap();
        let state = state_with_docs(&dir);

        // A notification before initialize is acknowledged, and initialize
        // can be repeated without prior state.
        for method in ["notifications/initialized", "initialize", "initialize"] {
            let response = process_request(
                &state,
                serde_json::from_value(serde_json::json!({
                    "jsonrpc": "2.0", "id": 1, "method": method
                }))
                .unwrap(),
            );
            assert!(response.error.is_none(), "{} failed", method);
        }
    }
}
