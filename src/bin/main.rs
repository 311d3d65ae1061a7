use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use todoist_mcp::config::{API_TOKEN_ENV, BASE_URL_ENV, TIMEOUT_ENV};
use todoist_mcp::logging::init_tracing;
use todoist_mcp::{ConfigError, TodoistConfig, create_server, start_mcp_http};

// rmcp imports for MCP stdio server mode
use rmcp::service::ServiceExt;
use rmcp::transport::stdio;

#[derive(Parser)]
#[command(name = "todoist-mcp")]
#[command(about = "MCP server exposing Todoist tasks, projects, sections, labels and comments")]
struct Cli {
    /// Todoist API token
    #[arg(long, global = true, env = "TODOIST_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,
    /// Base URL of the Todoist REST API
    #[arg(long, global = true, env = "TODOIST_API_URL")]
    base_url: Option<String>,
    /// Timeout for each Todoist request, in seconds
    #[arg(long, global = true, env = "TODOIST_TIMEOUT_SECS")]
    timeout_secs: Option<String>,
    /// Write JSON logs to this file instead of stderr
    #[arg(long, global = true, env = "MCP_LOG_FILE")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as an MCP stdio server (for use in mcp.json)
    McpStdio,
    /// Run as an MCP HTTP server
    McpHttp {
        /// Bind address, e.g. 0.0.0.0:3942
        #[arg(long, default_value = "127.0.0.1:3942")]
        bind: String,
    },
    /// Print the tool catalogue as JSON and exit
    ListTools,
}

impl Cli {
    /// Resolve flags and their env fallbacks through the shared config loader.
    fn todoist_config(&self) -> Result<TodoistConfig, ConfigError> {
        TodoistConfig::from_lookup(|key| match key {
            API_TOKEN_ENV => self.api_token.clone(),
            BASE_URL_ENV => self.base_url.clone(),
            TIMEOUT_ENV => self.timeout_secs.clone(),
            _ => None,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = cli.todoist_config()?;
    let server = create_server(&config)?;

    match cli.command {
        Commands::McpStdio => {
            info!("Starting MCP stdio server against {}", config.base_url());

            // Run as an MCP stdio server. McpServer implements ServerHandler.
            let service = server
                .as_ref()
                .clone()
                .serve(stdio())
                .await
                .inspect_err(|e| tracing::error!("serving error: {:?}", e))?;

            // Block until the MCP session ends.
            service.waiting().await?;
            info!("MCP stdio server session ended");
        }
        Commands::McpHttp { bind } => {
            info!("Starting MCP HTTP server on {} against {}", bind, config.base_url());
            start_mcp_http(server, &bind).await?;
        }
        Commands::ListTools => {
            let tools = server.tool_registry().list_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
    }

    Ok(())
}
