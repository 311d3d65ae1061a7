//! In-memory [`TodoistApi`] for handler and registry tests.

use std::sync::Mutex;

use rmcp::model::JsonObject;
use serde_json::{Value, json};

use super::{ApiError, ApiFuture, ListQuery, Page, ResourceKind, TodoistApi};
use crate::types::ResourceId;

/// One recorded upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub op: &'static str,
    pub kind: ResourceKind,
    pub id: Option<String>,
    pub fields: Option<JsonObject>,
    pub query: Option<ListQuery>,
}

pub struct MockTodoistApi {
    calls: Mutex<Vec<RecordedCall>>,
    fail_with: Option<ApiError>,
    ack: bool,
    next_cursor: Option<String>,
}

impl Default for MockTodoistApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTodoistApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: None,
            ack: true,
            next_cursor: None,
        }
    }

    /// Every call fails with `error`.
    pub fn failing(error: ApiError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new()
        }
    }

    /// Acknowledged operations answer `ack` instead of `true`.
    pub fn with_ack(mut self, ack: bool) -> Self {
        self.ack = ack;
        self
    }

    pub fn with_next_cursor(mut self, cursor: &str) -> Self {
        self.next_cursor = Some(cursor.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls().pop().expect("no upstream call recorded")
    }

    fn record(
        &self,
        op: &'static str,
        kind: ResourceKind,
        id: Option<&ResourceId>,
        fields: Option<JsonObject>,
        query: Option<ListQuery>,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            op,
            kind,
            id: id.map(|id| id.to_string()),
            fields,
            query,
        });
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn page(&self) -> Page {
        Page {
            results: vec![json!({"id": "1"})],
            next_cursor: self.next_cursor.clone(),
        }
    }
}

impl TodoistApi for MockTodoistApi {
    fn create(&self, kind: ResourceKind, fields: JsonObject) -> ApiFuture<'_, Value> {
        Box::pin(async move {
            self.record("create", kind, None, Some(fields.clone()), None)?;
            let mut created = fields;
            created.insert("id".into(), json!("1"));
            Ok(Value::Object(created))
        })
    }

    fn get<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, Value> {
        Box::pin(async move {
            self.record("get", kind, Some(id), None, None)?;
            Ok(json!({"id": id}))
        })
    }

    fn list(&self, kind: ResourceKind, query: ListQuery) -> ApiFuture<'_, Page> {
        Box::pin(async move {
            self.record("list", kind, None, None, Some(query))?;
            Ok(self.page())
        })
    }

    fn update<'a>(
        &'a self,
        kind: ResourceKind,
        id: &'a ResourceId,
        fields: JsonObject,
    ) -> ApiFuture<'a, Value> {
        Box::pin(async move {
            self.record("update", kind, Some(id), Some(fields.clone()), None)?;
            let mut updated = fields;
            updated.insert("id".into(), json!(id));
            Ok(Value::Object(updated))
        })
    }

    fn delete<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool> {
        Box::pin(async move {
            self.record("delete", kind, Some(id), None, None)?;
            Ok(self.ack)
        })
    }

    fn close<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool> {
        Box::pin(async move {
            self.record("close", kind, Some(id), None, None)?;
            Ok(self.ack)
        })
    }

    fn reopen<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool> {
        Box::pin(async move {
            self.record("reopen", kind, Some(id), None, None)?;
            Ok(self.ack)
        })
    }

    fn list_collaborators<'a>(
        &'a self,
        project_id: &'a ResourceId,
        query: ListQuery,
    ) -> ApiFuture<'a, Page> {
        Box::pin(async move {
            self.record(
                "list_collaborators",
                ResourceKind::Project,
                Some(project_id),
                None,
                Some(query),
            )?;
            Ok(self.page())
        })
    }
}
