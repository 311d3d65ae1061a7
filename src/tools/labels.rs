//! Label tools.

use std::sync::Arc;

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use super::{Envelope, RegistryError, ToolInput, ToolRegistryBuilder, default_limit};
use crate::todoist::{ListQuery, ResourceKind, TodoistApi, to_fields};
use crate::types::ResourceId;

/// Todoist's named color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LabelColor {
    BerryRed,
    LightBlue,
    Red,
    Blue,
    Orange,
    Grape,
    Yellow,
    Violet,
    OliveGreen,
    Lavender,
    LimeGreen,
    Magenta,
    Green,
    Salmon,
    MintGreen,
    Charcoal,
    Teal,
    Grey,
    SkyBlue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AddLabelInput {
    #[schemars(description = "The name of the label", length(min = 1))]
    pub name: String,
    #[schemars(description = "The color of the label")]
    pub color: Option<LabelColor>,
    #[schemars(description = "Whether to mark the label as a favorite")]
    pub is_favorite: Option<bool>,
    #[schemars(description = "Order of the label in the label list")]
    pub order: Option<i64>,
}

impl ToolInput for AddLabelInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct LabelIdInput {
    #[schemars(description = "The ID of the label", length(min = 1))]
    pub label_id: String,
}

impl ToolInput for LabelIdInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ListLabelsInput {
    #[schemars(description = "Cursor for pagination")]
    pub cursor: Option<String>,
    #[serde(default = "default_limit")]
    #[schemars(
        description = "Maximum number of items to return (1-200). Default: 50",
        range(min = 1, max = 200)
    )]
    pub limit: u32,
}

impl ToolInput for ListLabelsInput {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateLabelInput {
    #[serde(skip_serializing)]
    #[schemars(description = "The ID of the label to update", length(min = 1))]
    pub label_id: String,
    #[schemars(description = "The updated name of the label", length(min = 1))]
    pub name: Option<String>,
    #[schemars(description = "The color of the label")]
    pub color: Option<LabelColor>,
    #[schemars(description = "Whether to mark the label as a favorite")]
    pub is_favorite: Option<bool>,
    #[schemars(description = "Order of the label in the label list")]
    pub order: Option<i64>,
}

impl ToolInput for UpdateLabelInput {}

pub async fn add_label(api: Arc<dyn TodoistApi>, input: AddLabelInput) -> Envelope {
    let result = api.create(ResourceKind::Label, to_fields(&input)).await;
    Envelope::from_result(result, "Label added successfully")
}

pub async fn get_label(api: Arc<dyn TodoistApi>, input: LabelIdInput) -> Envelope {
    let id = ResourceId::new(input.label_id);
    let result = api.get(ResourceKind::Label, &id).await;
    Envelope::from_result(result, "Label retrieved successfully")
}

pub async fn list_labels(api: Arc<dyn TodoistApi>, input: ListLabelsInput) -> Envelope {
    let query = ListQuery::new(input.cursor, input.limit);
    let result = api.list(ResourceKind::Label, query).await;
    Envelope::from_page(result, "Labels retrieved successfully")
}

pub async fn update_label(api: Arc<dyn TodoistApi>, input: UpdateLabelInput) -> Envelope {
    let id = ResourceId::new(input.label_id.clone());
    let result = api.update(ResourceKind::Label, &id, to_fields(&input)).await;
    Envelope::from_result(result, "Label updated successfully")
}

pub async fn delete_label(api: Arc<dyn TodoistApi>, input: LabelIdInput) -> Envelope {
    let id = ResourceId::new(input.label_id);
    let result = api.delete(ResourceKind::Label, &id).await;
    Envelope::from_ack(result, "Label deleted successfully", "Unable to delete the label")
}

pub fn register_label_tools(
    builder: ToolRegistryBuilder,
) -> Result<ToolRegistryBuilder, RegistryError> {
    builder
        .tool("add_label", "Create a personal label", add_label)?
        .tool("get_label", "Get a personal label", get_label)?
        .tool("list_labels", "List personal labels", list_labels)?
        .tool("update_label", "Update a personal label", update_label)?
        .tool("delete_label", "Delete a personal label", delete_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todoist::mock::MockTodoistApi;
    use crate::tools::{DispatchError, ToolRegistry};
    use rmcp::model::JsonObject;
    use serde_json::{Value, json};

    fn registry(api: Arc<MockTodoistApi>) -> ToolRegistry {
        register_label_tools(ToolRegistry::builder(api)).unwrap().build()
    }

    fn args(value: Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[tokio::test]
    async fn test_add_label_color_palette() {
        let api = Arc::new(MockTodoistApi::new());
        let registry = registry(api.clone());

        let envelope = registry
            .dispatch("add_label", args(json!({"name": "errands", "color": "berry_red"})))
            .await
            .unwrap();
        assert!(envelope.is_success());
        assert_eq!(
            Value::Object(api.last_call().fields.unwrap()),
            json!({"name": "errands", "color": "berry_red"})
        );

        let err = registry
            .dispatch("add_label", args(json!({"name": "errands", "color": "pink"})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("color"));
    }

    #[tokio::test]
    async fn test_list_labels_limit_bound() {
        let api = Arc::new(MockTodoistApi::new());
        let err = registry(api.clone())
            .dispatch("list_labels", args(json!({"limit": 500})))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::InvalidArguments(_)));
        assert!(
            err.to_string()
                .starts_with("Invalid arguments: limit: 500 is greater than the maximum of 200")
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_labels_zero_limit() {
        let api = Arc::new(MockTodoistApi::new());
        let err = registry(api)
            .dispatch("list_labels", args(json!({"limit": 0})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[tokio::test]
    async fn test_list_labels_integral_float_limit() {
        let api = Arc::new(MockTodoistApi::new());
        let envelope = registry(api.clone())
            .dispatch("list_labels", args(json!({"limit": 50.0})))
            .await
            .unwrap();

        assert!(envelope.is_success());
        assert_eq!(api.last_call().query.unwrap().limit, Some(50));
    }

    #[tokio::test]
    async fn test_update_label_is_favorite() {
        let api = Arc::new(MockTodoistApi::new());
        registry(api.clone())
            .dispatch("update_label", args(json!({"label_id": "l1", "is_favorite": true})))
            .await
            .unwrap();

        let call = api.last_call();
        assert_eq!(call.id.as_deref(), Some("l1"));
        assert_eq!(Value::Object(call.fields.unwrap()), json!({"is_favorite": true}));
    }

    #[tokio::test]
    async fn test_delete_label_soft_failure() {
        let api = Arc::new(MockTodoistApi::new().with_ack(false));
        let envelope = registry(api)
            .dispatch("delete_label", args(json!({"label_id": "l1"})))
            .await
            .unwrap();
        assert_eq!(envelope, Envelope::soft_failure("Unable to delete the label"));
    }
}
