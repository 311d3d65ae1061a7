//! The upstream capability consumed by tool handlers.
//!
//! Handlers only ever see `Arc<dyn TodoistApi>`; the production
//! implementation is [`TodoistClient`], tests substitute an in-memory mock.

mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use client::TodoistClient;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ResourceId;

/// Boxed future returned by every [`TodoistApi`] call.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Kinds of Todoist resources exposed as tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Task,
    Project,
    Section,
    Label,
    Comment,
}

impl ResourceKind {
    /// Collection path segment used by the REST API.
    pub fn path(self) -> &'static str {
        match self {
            Self::Task => "tasks",
            Self::Project => "projects",
            Self::Section => "sections",
            Self::Label => "labels",
            Self::Comment => "comments",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Task => "task",
            Self::Project => "project",
            Self::Section => "section",
            Self::Label => "label",
            Self::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Filter and paging parameters for a list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Resource-specific filters, sent as query parameters in insertion order.
    pub filters: Vec<(String, String)>,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new(cursor: Option<String>, limit: u32) -> Self {
        Self {
            filters: Vec::new(),
            cursor: cursor.filter(|c| !c.is_empty()),
            limit: Some(limit),
        }
    }

    /// Add a filter when a value is present.
    pub fn filter(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.filters.push((key.to_string(), value.to_string()));
        }
        self
    }
}

/// One page of a list call, normalized to `{results, next_cursor}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub results: Vec<Value>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Failures raised by the upstream capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, timeout...).
    Transport(String),
    /// The API answered with a non-success status.
    Status { status: u16, message: String },
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "Request failed: {}", msg),
            Self::Status { status, message } if message.is_empty() => {
                write!(f, "Request failed with status code {}", status)
            }
            Self::Status { status, message } => {
                write!(f, "Request failed with status code {}: {}", status, message)
            }
            Self::Decode(msg) => write!(f, "Invalid response from Todoist: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Resource operations offered by the Todoist service.
///
/// The boolean results of `delete`, `close` and `reopen` report whether the
/// service acknowledged the operation; `Ok(false)` is a soft failure, distinct
/// from an `Err`.
pub trait TodoistApi: Send + Sync {
    fn create(&self, kind: ResourceKind, fields: JsonObject) -> ApiFuture<'_, Value>;

    fn get<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, Value>;

    fn list(&self, kind: ResourceKind, query: ListQuery) -> ApiFuture<'_, Page>;

    fn update<'a>(
        &'a self,
        kind: ResourceKind,
        id: &'a ResourceId,
        fields: JsonObject,
    ) -> ApiFuture<'a, Value>;

    fn delete<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool>;

    fn close<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool>;

    fn reopen<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool>;

    /// Collaborators of a shared project.
    fn list_collaborators<'a>(
        &'a self,
        project_id: &'a ResourceId,
        query: ListQuery,
    ) -> ApiFuture<'a, Page>;
}

/// Serialize a request struct into a field map, dropping nulls.
pub fn to_fields<T: Serialize>(value: &T) -> JsonObject {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => JsonObject::new(),
    }
}
