//! Tool registry for the Todoist operations.
//!
//! Tools are registered on a [`ToolRegistryBuilder`] at startup. Building it
//! yields an immutable [`ToolRegistry`], the only type that can dispatch, so no
//! call can observe a half-registered catalogue.

use std::borrow::Cow;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool as McpTool};
use tracing::{debug, info};

use super::envelope::Envelope;
use super::error::{DispatchError, RegistryError};
use super::schema::{InputSchema, ToolInput, ValidationFailure};
use crate::todoist::TodoistApi;
use crate::types::ToolName;

/// Future returned by a tool handler.
pub type EnvelopeFuture = Pin<Box<dyn Future<Output = Envelope> + Send>>;

type Handler<I> = Box<dyn Fn(Arc<dyn TodoistApi>, I) -> EnvelopeFuture + Send + Sync>;

/// Discovery metadata for one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: ToolName,
    pub description: String,
    pub input_schema: JsonObject,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<ToolName>,
        description: impl Into<String>,
        input_schema: JsonObject,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Describe `entry`, advertising the schema it validates with.
    pub fn for_entry<I: ToolInput>(
        name: impl Into<ToolName>,
        description: impl Into<String>,
        entry: &ToolEntry<I>,
    ) -> Self {
        Self::new(name, description, entry.schema().document().clone())
    }

    /// Converts this descriptor to an `McpTool` for use in `list_tools`.
    pub fn to_mcp_tool(&self) -> McpTool {
        McpTool {
            name: Cow::Owned(self.name.to_string()),
            title: None,
            description: Some(Cow::Owned(self.description.clone())),
            input_schema: Arc::new(self.input_schema.clone()),
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        }
    }
}

/// Validator and handler for one tool, typed by its input.
pub struct ToolEntry<I> {
    schema: InputSchema<I>,
    handler: Handler<I>,
}

impl<I: ToolInput> ToolEntry<I> {
    pub fn new<F, Fut>(handler: F) -> Result<Self, RegistryError>
    where
        F: Fn(Arc<dyn TodoistApi>, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Envelope> + Send + 'static,
    {
        Ok(Self {
            schema: InputSchema::new()?,
            handler: Box::new(move |api, input| Box::pin(handler(api, input))),
        })
    }

    pub fn schema(&self) -> &InputSchema<I> {
        &self.schema
    }
}

/// Input-erased view of a [`ToolEntry`] so entries of different types share one table.
trait ErasedEntry: Send + Sync {
    /// Validate the arguments and, if they pass, start the handler.
    fn prepare(
        &self,
        api: Arc<dyn TodoistApi>,
        arguments: &JsonObject,
    ) -> Result<EnvelopeFuture, ValidationFailure>;
}

impl<I: ToolInput> ErasedEntry for ToolEntry<I> {
    fn prepare(
        &self,
        api: Arc<dyn TodoistApi>,
        arguments: &JsonObject,
    ) -> Result<EnvelopeFuture, ValidationFailure> {
        let input = self.schema.validate(arguments)?;
        Ok((self.handler)(api, input))
    }
}

type Slot = (ToolDescriptor, Box<dyn ErasedEntry>);

/// Collects tools before the registry is frozen.
pub struct ToolRegistryBuilder {
    api: Arc<dyn TodoistApi>,
    tools: Vec<Slot>,
    index: HashMap<ToolName, usize>,
}

impl ToolRegistryBuilder {
    /// Register a tool; fails if the name is taken.
    pub fn register<I: ToolInput>(
        mut self,
        descriptor: ToolDescriptor,
        entry: ToolEntry<I>,
    ) -> Result<Self, RegistryError> {
        if self.index.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateTool(descriptor.name.into_inner()));
        }

        debug!(tool = %descriptor.name, "Registering tool");
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push((descriptor, Box::new(entry)));
        Ok(self)
    }

    /// Register a tool, overwriting any previous tool of the same name.
    ///
    /// An overwritten tool keeps its original position in the listing.
    pub fn replace<I: ToolInput>(mut self, descriptor: ToolDescriptor, entry: ToolEntry<I>) -> Self {
        match self.index.get(&descriptor.name) {
            Some(&slot) => {
                debug!(tool = %descriptor.name, "Replacing tool");
                self.tools[slot] = (descriptor, Box::new(entry));
            }
            None => {
                self.index.insert(descriptor.name.clone(), self.tools.len());
                self.tools.push((descriptor, Box::new(entry)));
            }
        }
        self
    }

    /// Register `handler` under `name`, deriving the descriptor from its input type.
    pub fn tool<I, F, Fut>(
        self,
        name: &str,
        description: &str,
        handler: F,
    ) -> Result<Self, RegistryError>
    where
        I: ToolInput,
        F: Fn(Arc<dyn TodoistApi>, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Envelope> + Send + 'static,
    {
        let entry = ToolEntry::new(handler)?;
        let descriptor = ToolDescriptor::for_entry(name, description, &entry);
        self.register(descriptor, entry)
    }

    /// Freeze the catalogue.
    pub fn build(self) -> ToolRegistry {
        info!(tools = self.tools.len(), "Tool registry ready");
        ToolRegistry {
            api: self.api,
            tools: self.tools,
            index: self.index,
        }
    }
}

/// Immutable catalogue of tools and the single dispatch point for calls.
pub struct ToolRegistry {
    api: Arc<dyn TodoistApi>,
    tools: Vec<Slot>,
    index: HashMap<ToolName, usize>,
}

impl ToolRegistry {
    /// Start registering tools that will call `api`.
    pub fn builder(api: Arc<dyn TodoistApi>) -> ToolRegistryBuilder {
        ToolRegistryBuilder {
            api,
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// All descriptors, in registration order.
    pub fn list_descriptors(&self) -> Vec<ToolDescriptor> {
        info!(tools = self.tools.len(), "Listing tools");
        self.tools
            .iter()
            .map(|(descriptor, _)| descriptor.clone())
            .collect()
    }

    /// Descriptors in the form advertised over MCP.
    pub fn list_tools(&self) -> Vec<McpTool> {
        self.list_descriptors()
            .iter()
            .map(ToolDescriptor::to_mcp_tool)
            .collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .map(|(descriptor, _)| descriptor.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolve, validate and run one call.
    ///
    /// Structural failures (no arguments, unknown name, invalid arguments) are
    /// returned as errors. Anything the handler reports, including upstream
    /// failures, comes back as an [`Envelope`].
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<Envelope, DispatchError> {
        let arguments = arguments.ok_or(DispatchError::MissingArguments)?;

        let (_, entry) = self
            .index
            .get(name)
            .and_then(|&slot| self.tools.get(slot))
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        let call = entry.prepare(self.api.clone(), &arguments).map_err(|failure| {
            debug!(tool = %name, %failure, "Rejected tool arguments");
            DispatchError::InvalidArguments(failure)
        })?;

        info!(tool = %name, "Calling tool");
        Ok(call.await)
    }

    /// Dispatch and wrap the envelope as MCP content.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, DispatchError> {
        self.dispatch(name, arguments)
            .await?
            .into_call_tool_result()
    }
}
