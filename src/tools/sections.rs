//! Section tools.

use std::sync::Arc;

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use super::{Envelope, RegistryError, ToolInput, ToolRegistryBuilder, default_limit};
use crate::todoist::{ListQuery, ResourceKind, TodoistApi, to_fields};
use crate::types::ResourceId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AddSectionInput {
    #[schemars(description = "The name of the section", length(min = 1))]
    pub name: String,
    #[schemars(description = "ID of the project this section belongs to", length(min = 1))]
    pub project_id: String,
    #[schemars(description = "Order of the section in the project")]
    pub order: Option<i64>,
}

impl ToolInput for AddSectionInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct SectionIdInput {
    #[schemars(description = "The ID of the section", length(min = 1))]
    pub section_id: String,
}

impl ToolInput for SectionIdInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ListSectionsInput {
    #[schemars(description = "Filter sections by project ID", length(min = 1))]
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

impl ToolInput for ListSectionsInput {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateSectionInput {
    #[serde(skip_serializing)]
    #[schemars(description = "The ID of the section to update", length(min = 1))]
    pub section_id: String,
    #[schemars(description = "The updated name of the section", length(min = 1))]
    pub name: String,
}

impl ToolInput for UpdateSectionInput {}

pub async fn add_section(api: Arc<dyn TodoistApi>, input: AddSectionInput) -> Envelope {
    let result = api.create(ResourceKind::Section, to_fields(&input)).await;
    Envelope::from_result(result, "Section added successfully")
}

pub async fn get_section(api: Arc<dyn TodoistApi>, input: SectionIdInput) -> Envelope {
    let id = ResourceId::new(input.section_id);
    let result = api.get(ResourceKind::Section, &id).await;
    Envelope::from_result(result, "Section retrieved successfully")
}

pub async fn list_sections(api: Arc<dyn TodoistApi>, input: ListSectionsInput) -> Envelope {
    let query = ListQuery::new(input.cursor, input.limit)
        .filter("project_id", Some(input.project_id.as_str()));
    let result = api.list(ResourceKind::Section, query).await;
    Envelope::from_page(result, "Sections retrieved successfully")
}

pub async fn update_section(api: Arc<dyn TodoistApi>, input: UpdateSectionInput) -> Envelope {
    let id = ResourceId::new(input.section_id.clone());
    let result = api
        .update(ResourceKind::Section, &id, to_fields(&input))
        .await;
    Envelope::from_result(result, "Section updated successfully")
}

pub async fn delete_section(api: Arc<dyn TodoistApi>, input: SectionIdInput) -> Envelope {
    let id = ResourceId::new(input.section_id);
    let result = api.delete(ResourceKind::Section, &id).await;
    Envelope::from_ack(
        result,
        "Section deleted successfully",
        "Unable to delete the section",
    )
}

pub fn register_section_tools(
    builder: ToolRegistryBuilder,
) -> Result<ToolRegistryBuilder, RegistryError> {
    builder
        .tool("add_section", "Create a section in a project", add_section)?
        .tool("get_section", "Get a section", get_section)?
        .tool("list_sections", "List the sections of a project", list_sections)?
        .tool("update_section", "Rename a section", update_section)?
        .tool("delete_section", "Delete a section", delete_section)
}
