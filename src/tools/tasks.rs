//! Task tools.

use std::sync::Arc;

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use super::{Envelope, RegistryError, ToolInput, ToolRegistryBuilder, default_limit};
use crate::todoist::{ListQuery, ResourceKind, TodoistApi, to_fields};
use crate::types::ResourceId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AddTaskInput {
    #[schemars(
        description = "The text of the task. May contain markdown-formatted text and hyperlinks",
        length(min = 1)
    )]
    pub content: String,
    #[schemars(description = "A description for the task. May contain markdown")]
    pub description: Option<String>,
    #[schemars(
        description = "Task priority from 1 (normal) to 4 (very urgent)",
        range(min = 1, max = 4)
    )]
    pub priority: Option<u8>,
    #[schemars(description = "ID of the project to add the task to. Defaults to the inbox")]
    pub project_id: Option<String>,
    #[schemars(description = "ID of the section to add the task to")]
    pub section_id: Option<String>,
    #[schemars(description = "Due date in natural language, e.g. \"tomorrow at 5pm\"")]
    pub due_string: Option<String>,
    #[schemars(description = "Label names to attach to the task")]
    pub labels: Option<Vec<String>>,
}

impl ToolInput for AddTaskInput {}

/// Input for the tools that address a single task.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct TaskIdInput {
    #[schemars(description = "The ID of the task", length(min = 1))]
    pub task_id: String,
}

impl ToolInput for TaskIdInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ListTasksInput {
    #[schemars(description = "Filter tasks by project ID")]
    pub project_id: Option<String>,
    #[schemars(description = "Filter tasks by section ID")]
    pub section_id: Option<String>,
    #[schemars(description = "Filter tasks by parent task ID")]
    pub parent_id: Option<String>,
    #[schemars(description = "Filter tasks by label name")]
    pub label: Option<String>,
    #[schemars(description = "Cursor for pagination")]
    pub cursor: Option<String>,
    #[serde(default = "default_limit")]
    #[schemars(
        description = "Maximum number of items to return (1-200). Default: 50",
        range(min = 1, max = 200)
    )]
    pub limit: u32,
}

impl ToolInput for ListTasksInput {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTaskInput {
    #[serde(skip_serializing)]
    #[schemars(description = "The ID of the task to update", length(min = 1))]
    pub task_id: String,
    #[schemars(description = "The new text of the task", length(min = 1))]
    pub content: Option<String>,
    #[schemars(description = "The new description of the task")]
    pub description: Option<String>,
    #[schemars(
        description = "Task priority from 1 (normal) to 4 (very urgent)",
        range(min = 1, max = 4)
    )]
    pub priority: Option<u8>,
    #[schemars(description = "Due date in natural language")]
    pub due_string: Option<String>,
    #[schemars(description = "Label names, replacing the current ones")]
    pub labels: Option<Vec<String>>,
}

impl ToolInput for UpdateTaskInput {}

pub async fn add_task(api: Arc<dyn TodoistApi>, input: AddTaskInput) -> Envelope {
    let result = api.create(ResourceKind::Task, to_fields(&input)).await;
    Envelope::from_result(result, "Task added successfully")
}

pub async fn get_task(api: Arc<dyn TodoistApi>, input: TaskIdInput) -> Envelope {
    let id = ResourceId::new(input.task_id);
    let result = api.get(ResourceKind::Task, &id).await;
    Envelope::from_result(result, "Task retrieved successfully")
}

pub async fn list_tasks(api: Arc<dyn TodoistApi>, input: ListTasksInput) -> Envelope {
    let query = ListQuery::new(input.cursor, input.limit)
        .filter("project_id", input.project_id.as_deref())
        .filter("section_id", input.section_id.as_deref())
        .filter("parent_id", input.parent_id.as_deref())
        .filter("label", input.label.as_deref());

    let result = api.list(ResourceKind::Task, query).await;
    Envelope::from_page(result, "Tasks retrieved successfully")
}

pub async fn update_task(api: Arc<dyn TodoistApi>, input: UpdateTaskInput) -> Envelope {
    let id = ResourceId::new(input.task_id.clone());
    let result = api.update(ResourceKind::Task, &id, to_fields(&input)).await;
    Envelope::from_result(result, "Task updated successfully")
}

pub async fn close_task(api: Arc<dyn TodoistApi>, input: TaskIdInput) -> Envelope {
    let id = ResourceId::new(input.task_id);
    let result = api.close(ResourceKind::Task, &id).await;
    Envelope::from_ack(result, "Task closed successfully", "Unable to close the task")
}

pub async fn reopen_task(api: Arc<dyn TodoistApi>, input: TaskIdInput) -> Envelope {
    let id = ResourceId::new(input.task_id);
    let result = api.reopen(ResourceKind::Task, &id).await;
    Envelope::from_ack(result, "Task reopened successfully", "Unable to reopen the task")
}

pub async fn delete_task(api: Arc<dyn TodoistApi>, input: TaskIdInput) -> Envelope {
    let id = ResourceId::new(input.task_id);
    let result = api.delete(ResourceKind::Task, &id).await;
    Envelope::from_ack(result, "Task deleted successfully", "Unable to delete the task")
}

pub fn register_task_tools(
    builder: ToolRegistryBuilder,
) -> Result<ToolRegistryBuilder, RegistryError> {
    builder
        .tool("add_task", "Create a TODO task", add_task)?
        .tool("get_task", "Get a TODO task", get_task)?
        .tool("list_tasks", "List and filter TODO tasks", list_tasks)?
        .tool("update_task", "Update a TODO task", update_task)?
        .tool("close_task", "Close a TODO task", close_task)?
        .tool("reopen_task", "Reopen a TODO task", reopen_task)?
        .tool("delete_task", "Delete a TODO task", delete_task)
}
