pub mod config;
pub mod logging;
pub mod server;
pub mod todoist;
pub mod tools;
pub mod types;

pub use config::{ConfigError, TodoistConfig};
pub use server::{McpServer, start_mcp_http};
pub use todoist::{TodoistApi, TodoistClient};
pub use tools::{DispatchError, Envelope, ToolRegistry, todoist_registry};

use std::sync::Arc;

use anyhow::Result;

/// Convenience function to create a fully configured MCP server.
///
/// Builds the Todoist client, registers every tool and freezes the registry.
pub fn create_server(config: &TodoistConfig) -> Result<Arc<McpServer>> {
    let client = TodoistClient::new(config)?;
    let registry = todoist_registry(Arc::new(client))?;
    tracing::info!(tools = registry.len(), base_url = %config.base_url(), "Todoist tools registered");

    Ok(Arc::new(McpServer::new(Arc::new(registry))))
}
