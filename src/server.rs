//! MCP server implementation using rmcp.
//!
//! Exposes the tool registry over stdio or streamable HTTP.

use std::sync::Arc;

use anyhow::Result;
use axum::{Router, extract::State, response::Json, routing::get};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::tools::ToolRegistry;

/// MCP server that handles protocol requests and delegates to the tool registry.
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(tool_registry: Arc<ToolRegistry>) -> Self {
        Self { tool_registry }
    }

    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }
}

impl ServerHandler for McpServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let result = ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
            ..Default::default()
        };
        std::future::ready(Ok(result))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let tool_name = request.name.to_string();
        let arguments = request.arguments;
        let registry = self.tool_registry.clone();

        async move {
            registry
                .call_tool(&tool_name, arguments)
                .await
                .map_err(|e| {
                    warn!(tool = %tool_name, error = %e, "Tool call rejected");
                    e.to_mcp_error()
                })
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Manage Todoist tasks, projects, sections, labels and comments. \
                 Every tool answers with a JSON envelope carrying `success` plus \
                 either `message`/`data` or `error`."
                    .to_string(),
            ),
        }
    }
}

async fn health_check(State(server): State<Arc<McpServer>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "tools": server.tool_registry().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Router serving MCP at `/mcp` and a health check at `/health`.
pub fn create_router(server: Arc<McpServer>) -> Router {
    let service = StreamableHttpService::new(
        {
            let server = server.clone();
            move || Ok(server.as_ref().clone())
        },
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .route("/health", get(health_check))
        .nest_service("/mcp", service)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(server)
}

/// Serve MCP over streamable HTTP.
///
/// The MCP endpoint lives at `/mcp` on the given bind address,
/// e.g. `127.0.0.1:3942` or `0.0.0.0:3942`.
pub async fn start_mcp_http(server: Arc<McpServer>, bind: &str) -> Result<()> {
    let router = create_router(server);
    let listener = tokio::net::TcpListener::bind(bind).await?;

    info!("MCP HTTP server listening on http://{}/mcp", bind);
    axum::serve(listener, router).await?;

    Ok(())
}
