//! The uniform result every tool handler returns.

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::error::DispatchError;
use crate::todoist::{ApiError, Page};

/// Outcome of one tool call, serialized as `{"success": bool, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireEnvelope", try_from = "WireEnvelope")]
pub enum Envelope {
    Success {
        message: String,
        data: Option<Value>,
    },
    Failure {
        error: String,
        /// Set on soft failures, mirroring `error`.
        message: Option<String>,
    },
}

#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl From<Envelope> for WireEnvelope {
    fn from(envelope: Envelope) -> Self {
        match envelope {
            Envelope::Success { message, data } => Self {
                success: true,
                error: None,
                message: Some(message),
                data,
            },
            Envelope::Failure { error, message } => Self {
                success: false,
                error: Some(error),
                message,
                data: None,
            },
        }
    }
}

impl TryFrom<WireEnvelope> for Envelope {
    type Error = String;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        if wire.success {
            Ok(Self::Success {
                message: wire.message.ok_or("success envelope without message")?,
                data: wire.data,
            })
        } else {
            Ok(Self::Failure {
                error: wire.error.ok_or("failure envelope without error")?,
                message: wire.message,
            })
        }
    }
}

impl Envelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(message: impl Into<String>, data: Value) -> Self {
        Self::Success {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            message: None,
        }
    }

    /// The upstream completed but did not acknowledge the operation.
    pub fn soft_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Failure {
            error: message.clone(),
            message: Some(message),
        }
    }

    /// Map a single-resource upstream result.
    pub fn from_result(result: Result<Value, ApiError>, message: &str) -> Self {
        match result {
            Ok(data) => Self::with_data(message, data),
            Err(err) => Self::upstream_failure(err),
        }
    }

    /// Map a list result to `data = {results, next_cursor}`.
    pub fn from_page(result: Result<Page, ApiError>, message: &str) -> Self {
        match result {
            Ok(page) => match serde_json::to_value(page) {
                Ok(data) => Self::with_data(message, data),
                Err(err) => Self::failure(err.to_string()),
            },
            Err(err) => Self::upstream_failure(err),
        }
    }

    /// Map an acknowledged operation (delete, close, reopen).
    pub fn from_ack(result: Result<bool, ApiError>, message: &str, refused: &str) -> Self {
        match result {
            Ok(true) => Self::success(message),
            Ok(false) => {
                warn!(refused, "Todoist did not acknowledge the operation");
                Self::soft_failure(refused)
            }
            Err(err) => Self::upstream_failure(err),
        }
    }

    fn upstream_failure(err: ApiError) -> Self {
        warn!(error = %err, "Todoist request failed");
        Self::failure(err.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Wrap as a single pretty-printed JSON text block.
    pub fn into_call_tool_result(self) -> Result<CallToolResult, DispatchError> {
        let is_error = !self.is_success();
        let text =
            serde_json::to_string_pretty(&self).map_err(|e| DispatchError::Internal(e.to_string()))?;

        Ok(CallToolResult {
            content: vec![Content::text(text)],
            structured_content: None,
            is_error: Some(is_error),
            meta: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_wire_format() {
        let envelope = Envelope::with_data("Task added successfully", json!({"id": "1"}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "message": "Task added successfully", "data": {"id": "1"}})
        );

        let envelope = Envelope::success("Task closed successfully");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "message": "Task closed successfully"})
        );
    }

    #[test]
    fn test_failure_wire_format() {
        let envelope = Envelope::failure("Request failed with status code 404");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "error": "Request failed with status code 404"})
        );

        let envelope = Envelope::soft_failure("Unable to delete the task");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": false,
                "error": "Unable to delete the task",
                "message": "Unable to delete the task"
            })
        );
    }

    #[test]
    fn test_rejects_inconsistent_wire() {
        let parsed: Result<Envelope, _> = serde_json::from_value(json!({"success": false}));
        assert!(parsed.is_err());

        let parsed: Envelope =
            serde_json::from_value(json!({"success": true, "message": "ok"})).unwrap();
        assert_eq!(parsed, Envelope::success("ok"));
    }

    #[test]
    fn test_from_ack_tiers() {
        let ok = Envelope::from_ack(Ok(true), "Task deleted successfully", "Unable to delete the task");
        assert_eq!(ok, Envelope::success("Task deleted successfully"));

        let soft = Envelope::from_ack(Ok(false), "Task deleted successfully", "Unable to delete the task");
        assert_eq!(soft, Envelope::soft_failure("Unable to delete the task"));

        let hard = Envelope::from_ack(
            Err(ApiError::Transport("connection reset".into())),
            "Task deleted successfully",
            "Unable to delete the task",
        );
        assert_eq!(hard, Envelope::failure("Request failed: connection reset"));
    }

    #[test]
    fn test_from_page_shapes_data() {
        let page = Page {
            results: vec![json!({"id": "1"})],
            next_cursor: None,
        };
        let envelope = Envelope::from_page(Ok(page), "Labels retrieved successfully");
        assert_eq!(
            envelope,
            Envelope::with_data(
                "Labels retrieved successfully",
                json!({"results": [{"id": "1"}], "next_cursor": null})
            )
        );
    }

    #[test]
    fn test_into_call_tool_result() {
        let result = Envelope::soft_failure("Unable to close the task")
            .into_call_tool_result()
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);

        let text = result.content[0].raw.as_text().unwrap().text.clone();
        assert!(text.contains('\n'));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["success"], false);
    }
}
