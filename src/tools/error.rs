//! Structural errors raised by registration and dispatch.
//!
//! Business failures (upstream errors, soft failures) never appear here; they
//! travel inside [`Envelope::Failure`](super::Envelope).

use std::fmt;

use rmcp::ErrorData as McpError;

use super::schema::ValidationFailure;

/// Errors raised by [`ToolRegistry::dispatch`](super::ToolRegistry::dispatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The call carried no arguments object at all.
    MissingArguments,
    /// No tool is registered under the requested name.
    UnknownTool(String),
    /// The arguments failed schema validation.
    InvalidArguments(ValidationFailure),
    /// The envelope could not be turned into protocol content.
    Internal(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArguments => write!(f, "Arguments are required"),
            Self::UnknownTool(name) => write!(f, "Unknown tool: {}", name),
            Self::InvalidArguments(failure) => write!(f, "Invalid arguments: {}", failure),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DispatchError {}

impl DispatchError {
    /// Convert into the protocol-level error surfaced to the MCP client.
    pub fn to_mcp_error(&self) -> McpError {
        match self {
            Self::MissingArguments | Self::UnknownTool(_) | Self::InvalidArguments(_) => {
                McpError::invalid_params(self.to_string(), None)
            }
            Self::Internal(_) => McpError::internal_error(self.to_string(), None),
        }
    }
}

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with this name is already registered.
    DuplicateTool(String),
    /// The generated input schema could not be compiled.
    InvalidSchema(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTool(name) => write!(f, "Tool already registered: {}", name),
            Self::InvalidSchema(msg) => write!(f, "Invalid input schema: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}
