//! Comment tools.
//!
//! A comment hangs off either a task or a project. Adding and listing
//! require exactly one of `task_id` / `project_id`.

use std::sync::Arc;

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use super::{
    Envelope, RegistryError, ToolInput, ToolRegistryBuilder, ValidationIssue, default_limit,
};
use crate::todoist::{ListQuery, ResourceKind, TodoistApi, to_fields};
use crate::types::ResourceId;

/// Longest comment body Todoist accepts.
pub const MAX_COMMENT_LENGTH: u32 = 16384;

fn parent_issues(task_id: Option<&str>, project_id: Option<&str>) -> Vec<ValidationIssue> {
    match (task_id, project_id) {
        (None, None) => vec![ValidationIssue::new(
            &["task_id"],
            "Either task_id or project_id must be provided",
        )],
        (Some(_), Some(_)) => vec![ValidationIssue::new(
            &["task_id"],
            "Cannot specify both task_id and project_id",
        )],
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttachmentInput {
    #[schemars(description = "The file name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[schemars(description = "The file MIME type (e.g. \"image/png\", \"application/pdf\")")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[schemars(description = "The file URL", url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[schemars(description = "The resource type (e.g. \"file\", \"image\")")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AddCommentInput {
    #[schemars(description = "The ID of the task to comment on", length(min = 1))]
    pub task_id: Option<String>,
    #[schemars(
        description = "The ID of the project to comment on (alternative to task_id)",
        length(min = 1)
    )]
    pub project_id: Option<String>,
    #[schemars(
        description = "The comment content. May contain markdown. Maximum length: 16384 characters",
        length(min = 1, max = 16384)
    )]
    pub content: String,
    #[schemars(description = "Optional file attachment for the comment")]
    pub attachment: Option<AttachmentInput>,
}

impl ToolInput for AddCommentInput {
    fn refine(&self) -> Vec<ValidationIssue> {
        parent_issues(self.task_id.as_deref(), self.project_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct CommentIdInput {
    #[schemars(description = "The ID of the comment", length(min = 1))]
    pub comment_id: String,
}

impl ToolInput for CommentIdInput {}

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ListCommentsInput {
    #[schemars(description = "Return the comments of this task", length(min = 1))]
    pub task_id: Option<String>,
    #[schemars(description = "Return the comments of this project", length(min = 1))]
    pub project_id: Option<String>,
    #[schemars(description = "Cursor for pagination, the next_cursor of a previous response")]
    pub cursor: Option<String>,
    #[serde(default = "default_limit")]
    #[schemars(
        description = "Maximum number of items to return (1-200). Default: 50",
        range(min = 1, max = 200)
    )]
    pub limit: u32,
}

impl ToolInput for ListCommentsInput {
    fn refine(&self) -> Vec<ValidationIssue> {
        parent_issues(self.task_id.as_deref(), self.project_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateCommentInput {
    #[serde(skip_serializing)]
    #[schemars(description = "The ID of the comment to update", length(min = 1))]
    pub comment_id: String,
    #[schemars(
        description = "The updated comment content. May contain markdown",
        length(min = 1, max = 16384)
    )]
    pub content: String,
}

impl ToolInput for UpdateCommentInput {}

pub async fn add_comment(api: Arc<dyn TodoistApi>, input: AddCommentInput) -> Envelope {
    let result = api.create(ResourceKind::Comment, to_fields(&input)).await;
    Envelope::from_result(result, "Comment added successfully")
}

pub async fn get_comment(api: Arc<dyn TodoistApi>, input: CommentIdInput) -> Envelope {
    let id = ResourceId::new(input.comment_id);
    let result = api.get(ResourceKind::Comment, &id).await;
    Envelope::from_result(result, "Comment retrieved successfully")
}

pub async fn list_comments(api: Arc<dyn TodoistApi>, input: ListCommentsInput) -> Envelope {
    let query = ListQuery::new(input.cursor, input.limit)
        .filter("task_id", input.task_id.as_deref())
        .filter("project_id", input.project_id.as_deref());
    let result = api.list(ResourceKind::Comment, query).await;
    Envelope::from_page(result, "Comments retrieved successfully")
}

pub async fn update_comment(api: Arc<dyn TodoistApi>, input: UpdateCommentInput) -> Envelope {
    let id = ResourceId::new(input.comment_id.clone());
    let result = api
        .update(ResourceKind::Comment, &id, to_fields(&input))
        .await;
    Envelope::from_result(result, "Comment updated successfully")
}

pub async fn close_comment(api: Arc<dyn TodoistApi>, input: CommentIdInput) -> Envelope {
    let id = ResourceId::new(input.comment_id);
    let result = api.close(ResourceKind::Comment, &id).await;
    Envelope::from_ack(
        result,
        "Comment closed successfully",
        "Unable to close the comment",
    )
}

pub async fn reopen_comment(api: Arc<dyn TodoistApi>, input: CommentIdInput) -> Envelope {
    let id = ResourceId::new(input.comment_id);
    let result = api.reopen(ResourceKind::Comment, &id).await;
    Envelope::from_ack(
        result,
        "Comment reopened successfully",
        "Unable to reopen the comment",
    )
}

pub async fn delete_comment(api: Arc<dyn TodoistApi>, input: CommentIdInput) -> Envelope {
    let id = ResourceId::new(input.comment_id);
    let result = api.delete(ResourceKind::Comment, &id).await;
    Envelope::from_ack(
        result,
        "Comment deleted successfully",
        "Unable to delete the comment",
    )
}

pub fn register_comment_tools(
    builder: ToolRegistryBuilder,
) -> Result<ToolRegistryBuilder, RegistryError> {
    builder
        .tool("add_comment", "Add a comment to a task or project", add_comment)?
        .tool("get_comment", "Get a comment", get_comment)?
        .tool(
            "list_comments",
            "List the comments of a task or project",
            list_comments,
        )?
        .tool("update_comment", "Update a comment", update_comment)?
        .tool("close_comment", "Close a comment", close_comment)?
        .tool("reopen_comment", "Reopen a comment", reopen_comment)?
        .tool("delete_comment", "Delete a comment", delete_comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todoist::mock::MockTodoistApi;
    use crate::tools::{DispatchError, ToolRegistry};
    use rmcp::model::JsonObject;
    use serde_json::{Value, json};

    fn registry(api: Arc<MockTodoistApi>) -> ToolRegistry {
        register_comment_tools(ToolRegistry::builder(api))
            .unwrap()
            .build()
    }

    fn args(value: Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[tokio::test]
    async fn test_add_comment_needs_a_parent() {
        let api = Arc::new(MockTodoistApi::new());
        let err = registry(api.clone())
            .dispatch("add_comment", args(json!({"content": "Looks good"})))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid arguments: task_id: Either task_id or project_id must be provided"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_rejects_both_parents() {
        let api = Arc::new(MockTodoistApi::new());
        let err = registry(api)
            .dispatch(
                "add_comment",
                args(json!({"content": "x", "task_id": "t1", "project_id": "p1"})),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments: task_id: Cannot specify both task_id and project_id"
        );
    }

    #[tokio::test]
    async fn test_add_comment_with_attachment() {
        let api = Arc::new(MockTodoistApi::new());
        let envelope = registry(api.clone())
            .dispatch(
                "add_comment",
                args(json!({
                    "task_id": "t1",
                    "content": "See attached",
                    "attachment": {"file_name": "report.pdf", "file_url": "https://example.com/report.pdf"}
                })),
            )
            .await
            .unwrap();

        assert!(envelope.is_success());
        assert_eq!(
            Value::Object(api.last_call().fields.unwrap()),
            json!({
                "task_id": "t1",
                "content": "See attached",
                "attachment": {"file_name": "report.pdf", "file_url": "https://example.com/report.pdf"}
            })
        );
    }

    #[tokio::test]
    async fn test_add_comment_invalid_attachment_url() {
        let api = Arc::new(MockTodoistApi::new());
        let err = registry(api)
            .dispatch(
                "add_comment",
                args(json!({
                    "task_id": "t1",
                    "content": "x",
                    "attachment": {"file_url": "not a url"}
                })),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid arguments: attachment"));
    }

    #[tokio::test]
    async fn test_content_length_bounds() {
        let api = Arc::new(MockTodoistApi::new());
        let registry = registry(api);
        let long = "a".repeat(MAX_COMMENT_LENGTH as usize + 1);

        let err = registry
            .dispatch("update_comment", args(json!({"comment_id": "c1", "content": long})))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments(_)));
        assert!(err.to_string().contains("content"));

        let exact = "a".repeat(MAX_COMMENT_LENGTH as usize);
        let envelope = registry
            .dispatch("update_comment", args(json!({"comment_id": "c1", "content": exact})))
            .await
            .unwrap();
        assert!(envelope.is_success());
    }

    #[tokio::test]
    async fn test_list_comments_by_project() {
        let api = Arc::new(MockTodoistApi::new());
        let envelope = registry(api.clone())
            .dispatch("list_comments", args(json!({"project_id": "p1", "limit": 5})))
            .await
            .unwrap();

        assert!(envelope.is_success());
        let query = api.last_call().query.unwrap();
        assert_eq!(query.filters, vec![("project_id".to_string(), "p1".to_string())]);
        assert_eq!(query.limit, Some(5));
    }

    #[tokio::test]
    async fn test_list_comments_requires_one_parent() {
        let api = Arc::new(MockTodoistApi::new());
        let err = registry(api)
            .dispatch("list_comments", Some(JsonObject::new()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("task_id"));
    }

    #[tokio::test]
    async fn test_close_reopen_delete_soft_failures() {
        let api = Arc::new(MockTodoistApi::new().with_ack(false));
        let registry = registry(api);
        let id = json!({"comment_id": "c1"});

        let cases = [
            ("close_comment", "Unable to close the comment"),
            ("reopen_comment", "Unable to reopen the comment"),
            ("delete_comment", "Unable to delete the comment"),
        ];
        for (tool, message) in cases {
            let envelope = registry.dispatch(tool, args(id.clone())).await.unwrap();
            assert_eq!(envelope, Envelope::soft_failure(message));
        }
    }

    #[tokio::test]
    async fn test_get_comment() {
        let api = Arc::new(MockTodoistApi::new());
        let envelope = registry(api)
            .dispatch("get_comment", args(json!({"comment_id": "c9"})))
            .await
            .unwrap();
        assert_eq!(
            envelope,
            Envelope::with_data("Comment retrieved successfully", json!({"id": "c9"}))
        );
    }
}
