//! Project tools.

use std::sync::Arc;

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use super::{Envelope, RegistryError, ToolInput, ToolRegistryBuilder, default_limit};
use crate::todoist::{ListQuery, ResourceKind, TodoistApi, to_fields};
use crate::types::ResourceId;

/// How a project is displayed in Todoist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewStyle {
    List,
    Board,
    Calendar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AddProjectInput {
    #[schemars(description = "The name of the project", length(min = 1))]
    pub name: String,
    #[schemars(description = "ID of the parent project")]
    pub parent_id: Option<String>,
    #[schemars(description = "Color of the project (e.g. \"berry_red\", \"blue\", \"green\")")]
    pub color: Option<String>,
    #[schemars(description = "Whether the project is a favorite")]
    pub is_favorite: Option<bool>,
    #[schemars(description = "The view style of the project (list, board, or calendar)")]
    pub view_style: Option<ViewStyle>,
}

impl ToolInput for AddProjectInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ProjectIdInput {
    #[schemars(description = "The ID of the project", length(min = 1))]
    pub project_id: String,
}

impl ToolInput for ProjectIdInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ListProjectsInput {
    #[schemars(description = "Cursor for pagination")]
    pub cursor: Option<String>,
    #[serde(default = "default_limit")]
    #[schemars(
        description = "Maximum number of items to return (1-200). Default: 50",
        range(min = 1, max = 200)
    )]
    pub limit: u32,
}

impl ToolInput for ListProjectsInput {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateProjectInput {
    #[serde(skip_serializing)]
    #[schemars(description = "The ID of the project to update", length(min = 1))]
    pub project_id: String,
    #[schemars(description = "The updated name of the project", length(min = 1))]
    pub name: Option<String>,
    #[schemars(description = "The updated color of the project")]
    pub color: Option<String>,
    #[schemars(description = "Whether the project is a favorite")]
    pub is_favorite: Option<bool>,
    #[schemars(description = "The view style of the project (list, board, or calendar)")]
    pub view_style: Option<ViewStyle>,
}

impl ToolInput for UpdateProjectInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ProjectCollaboratorsInput {
    #[schemars(
        description = "The ID of the project to get collaborators for",
        length(min = 1)
    )]
    pub project_id: String,
    #[schemars(description = "Cursor for pagination")]
    pub cursor: Option<String>,
    #[serde(default = "default_limit")]
    #[schemars(
        description = "Maximum number of items to return (1-200). Default: 50",
        range(min = 1, max = 200)
    )]
    pub limit: u32,
}

impl ToolInput for ProjectCollaboratorsInput {}

pub async fn add_project(api: Arc<dyn TodoistApi>, input: AddProjectInput) -> Envelope {
    let result = api.create(ResourceKind::Project, to_fields(&input)).await;
    Envelope::from_result(result, "Project added successfully")
}

pub async fn get_project(api: Arc<dyn TodoistApi>, input: ProjectIdInput) -> Envelope {
    let id = ResourceId::new(input.project_id);
    let result = api.get(ResourceKind::Project, &id).await;
    Envelope::from_result(result, "Project retrieved successfully")
}

pub async fn list_projects(api: Arc<dyn TodoistApi>, input: ListProjectsInput) -> Envelope {
    let query = ListQuery::new(input.cursor, input.limit);
    let result = api.list(ResourceKind::Project, query).await;
    Envelope::from_page(result, "Projects retrieved successfully")
}

pub async fn update_project(api: Arc<dyn TodoistApi>, input: UpdateProjectInput) -> Envelope {
    let id = ResourceId::new(input.project_id.clone());
    let result = api
        .update(ResourceKind::Project, &id, to_fields(&input))
        .await;
    Envelope::from_result(result, "Project updated successfully")
}

pub async fn delete_project(api: Arc<dyn TodoistApi>, input: ProjectIdInput) -> Envelope {
    let id = ResourceId::new(input.project_id);
    let result = api.delete(ResourceKind::Project, &id).await;
    Envelope::from_ack(
        result,
        "Project deleted successfully",
        "Unable to delete the project",
    )
}

pub async fn get_project_collaborators(
    api: Arc<dyn TodoistApi>,
    input: ProjectCollaboratorsInput,
) -> Envelope {
    let id = ResourceId::new(input.project_id);
    let query = ListQuery::new(input.cursor, input.limit);
    let result = api.list_collaborators(&id, query).await;
    Envelope::from_page(result, "Project collaborators retrieved successfully")
}

pub fn register_project_tools(
    builder: ToolRegistryBuilder,
) -> Result<ToolRegistryBuilder, RegistryError> {
    builder
        .tool("add_project", "Create a project", add_project)?
        .tool("get_project", "Get a project", get_project)?
        .tool("list_projects", "List all projects", list_projects)?
        .tool("update_project", "Update a project", update_project)?
        .tool("delete_project", "Delete a project", delete_project)?
        .tool(
            "get_project_collaborators",
            "List the collaborators of a shared project",
            get_project_collaborators,
        )
}
