//! `reqwest`-backed implementation of [`TodoistApi`].

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ApiError, ApiFuture, ListQuery, Page, ResourceKind, TodoistApi};
use crate::config::TodoistConfig;
use crate::types::ResourceId;

/// HTTP client for the Todoist REST API v1.
#[derive(Clone)]
pub struct TodoistClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: String,
}

impl TodoistClient {
    /// Build a client from startup configuration.
    pub fn new(config: &TodoistConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("todoist-mcp/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url().clone(),
            api_token: config.api_token().to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("invalid base URL `{}`", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default().trim().to_string();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request whose only outcome is an acknowledgement.
    ///
    /// Todoist answers with `204 No Content` or a bare JSON boolean. Only an
    /// explicit `false` body counts as a refusal.
    async fn send_ack(&self, request: reqwest::RequestBuilder) -> Result<bool, ApiError> {
        let response = self.send(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(ack_from_body(&body))
    }

    async fn fetch_page(&self, mut url: Url, query: &ListQuery) -> Result<Page, ApiError> {
        apply_query(&mut url, query);
        debug!(url = %url, "GET page from Todoist");
        self.send_json(self.http.get(url)).await
    }
}

fn ack_from_body(body: &str) -> bool {
    !matches!(serde_json::from_str::<Value>(body.trim()), Ok(Value::Bool(false)))
}

fn apply_query(url: &mut Url, query: &ListQuery) {
    if query.filters.is_empty() && query.cursor.is_none() && query.limit.is_none() {
        return;
    }

    let mut pairs = url.query_pairs_mut();
    for (key, value) in &query.filters {
        pairs.append_pair(key, value);
    }
    if let Some(cursor) = &query.cursor {
        pairs.append_pair("cursor", cursor);
    }
    if let Some(limit) = query.limit {
        pairs.append_pair("limit", &limit.to_string());
    }
}

impl TodoistApi for TodoistClient {
    fn create(&self, kind: ResourceKind, fields: JsonObject) -> ApiFuture<'_, Value> {
        Box::pin(async move {
            let url = self.endpoint(&[kind.path()])?;
            debug!(url = %url, %kind, "POST create to Todoist");
            self.send_json(self.http.post(url).json(&fields)).await
        })
    }

    fn get<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, Value> {
        Box::pin(async move {
            let url = self.endpoint(&[kind.path(), id.as_str()])?;
            debug!(url = %url, %kind, "GET from Todoist");
            self.send_json(self.http.get(url)).await
        })
    }

    fn list(&self, kind: ResourceKind, query: ListQuery) -> ApiFuture<'_, Page> {
        Box::pin(async move {
            let url = self.endpoint(&[kind.path()])?;
            self.fetch_page(url, &query).await
        })
    }

    fn update<'a>(
        &'a self,
        kind: ResourceKind,
        id: &'a ResourceId,
        fields: JsonObject,
    ) -> ApiFuture<'a, Value> {
        Box::pin(async move {
            let url = self.endpoint(&[kind.path(), id.as_str()])?;
            debug!(url = %url, %kind, "POST update to Todoist");
            self.send_json(self.http.post(url).json(&fields)).await
        })
    }

    fn delete<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool> {
        Box::pin(async move {
            let url = self.endpoint(&[kind.path(), id.as_str()])?;
            debug!(url = %url, %kind, "DELETE on Todoist");
            self.send_ack(self.http.delete(url)).await
        })
    }

    fn close<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool> {
        Box::pin(async move {
            let url = self.endpoint(&[kind.path(), id.as_str(), "close"])?;
            debug!(url = %url, %kind, "POST close to Todoist");
            self.send_ack(self.http.post(url)).await
        })
    }

    fn reopen<'a>(&'a self, kind: ResourceKind, id: &'a ResourceId) -> ApiFuture<'a, bool> {
        Box::pin(async move {
            let url = self.endpoint(&[kind.path(), id.as_str(), "reopen"])?;
            debug!(url = %url, %kind, "POST reopen to Todoist");
            self.send_ack(self.http.post(url)).await
        })
    }

    fn list_collaborators<'a>(
        &'a self,
        project_id: &'a ResourceId,
        query: ListQuery,
    ) -> ApiFuture<'a, Page> {
        Box::pin(async move {
            let url = self.endpoint(&[
                ResourceKind::Project.path(),
                project_id.as_str(),
                "collaborators",
            ])?;
            self.fetch_page(url, &query).await
        })
    }
}
