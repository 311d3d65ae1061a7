//! Tool registry and the Todoist tool catalogue.
//!
//! Each resource module contributes its tools through a `register_*_tools`
//! function; [`todoist_registry`] chains them into one frozen registry.

mod envelope;
mod error;
mod registry;
mod schema;

pub mod comments;
pub mod labels;
pub mod projects;
pub mod sections;
pub mod tasks;

pub use envelope::Envelope;
pub use error::{DispatchError, RegistryError};
pub use registry::{EnvelopeFuture, ToolDescriptor, ToolEntry, ToolRegistry, ToolRegistryBuilder};
pub use schema::{InputSchema, ToolInput, ValidationFailure, ValidationIssue};

use std::sync::Arc;

use crate::todoist::TodoistApi;

/// Page size used when a list call does not ask for one.
pub const DEFAULT_LIMIT: u32 = 50;

pub(crate) fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Build the registry holding every Todoist tool.
pub fn todoist_registry(api: Arc<dyn TodoistApi>) -> Result<ToolRegistry, RegistryError> {
    let builder = ToolRegistry::builder(api);
    let builder = tasks::register_task_tools(builder)?;
    let builder = projects::register_project_tools(builder)?;
    let builder = sections::register_section_tools(builder)?;
    let builder = labels::register_label_tools(builder)?;
    let builder = comments::register_comment_tools(builder)?;
    Ok(builder.build())
}
