//! HTTP implementation of [`CircleCiApi`] over reqwest.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use rollback_core::{ApiConfig, Component, ComponentVersion, Environment, RetryConfig, RollbackRequest};

use crate::api::CircleCiApi;
use crate::error::ApiError;
use crate::retry::with_retry;
use crate::types::{DeploySettings, Paged, ProjectDetail, RerunWorkflowResponse, RollbackRun};

/// Client for the CircleCI v2 API.
///
/// One instance per server; the underlying reqwest client pools connections.
pub struct CircleCiClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl CircleCiClient {
    /// Build a client from configuration and a resolved API token.
    pub fn new(api: &ApiConfig, retry: RetryConfig, token: &str) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut token_value = reqwest::header::HeaderValue::from_str(token)
            .map_err(|e| ApiError::Config(format!("invalid API token: {}", e)))?;
        token_value.set_sensitive(true);
        headers.insert("Circle-Token", token_value);

        let http = reqwest::Client::builder()
            .user_agent(concat!("rollback-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(api.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check status and decode the body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET with retry and cancellation.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        with_retry(&self.retry, cancel, || async {
            let request = async {
                let response = self.http.get(&url).query(query).send().await?;
                Self::decode(response).await
            };
            tokio::select! {
                _ = cancel.cancelled() => Err(ApiError::Cancelled),
                result = request => result,
            }
        })
        .await
    }

    /// POST with retry and cancellation.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        with_retry(&self.retry, cancel, || async {
            let request = async {
                let response = self.http.post(&url).json(body).send().await?;
                Self::decode(response).await
            };
            tokio::select! {
                _ = cancel.cancelled() => Err(ApiError::Cancelled),
                result = request => result,
            }
        })
        .await
    }

    /// GET a paginated list, following `next_page_token` until exhausted.
    async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        base_query: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = base_query.to_vec();
            if let Some(token) = &page_token {
                query.push(("page-token".to_string(), token.clone()));
            }
            let page: Paged<T> = self.get_json(path, &query, cancel).await?;
            items.extend(page.items);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl CircleCiApi for CircleCiClient {
    async fn get_project(
        &self,
        slug: &str,
        cancel: &CancellationToken,
    ) -> Result<ProjectDetail, ApiError> {
        tracing::debug!(slug, "fetching project by slug");
        self.get_json(&format!("/project/{}", slug), &[], cancel).await
    }

    async fn get_project_by_id(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<ProjectDetail, ApiError> {
        tracing::debug!(project_id = %id, "fetching project by id");
        self.get_json(&format!("/project/{}", id), &[], cancel).await
    }

    async fn fetch_deploy_settings(
        &self,
        project_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<DeploySettings, ApiError> {
        self.get_json(&format!("/projects/{}/deploy-settings", project_id), &[], cancel)
            .await
    }

    async fn fetch_components(
        &self,
        project_id: Uuid,
        org_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<Component>, ApiError> {
        let query = [("org-id".to_string(), org_id.to_string())];
        self.get_paged(&format!("/projects/{}/components", project_id), &query, cancel)
            .await
    }

    async fn fetch_environments(
        &self,
        org_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<Environment>, ApiError> {
        self.get_paged(&format!("/organizations/{}/environments", org_id), &[], cancel)
            .await
    }

    async fn fetch_component_versions(
        &self,
        component_id: Uuid,
        environment_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<ComponentVersion>, ApiError> {
        let query = [
            ("component-id".to_string(), component_id.to_string()),
            ("environment-id".to_string(), environment_id.to_string()),
        ];
        self.get_paged("/deploy/component-versions", &query, cancel).await
    }

    async fn run_rollback_pipeline(
        &self,
        project_id: Uuid,
        request: &RollbackRequest,
        cancel: &CancellationToken,
    ) -> Result<RollbackRun, ApiError> {
        tracing::info!(
            project_id = %project_id,
            component = %request.component_name,
            environment = %request.environment_name,
            target_version = %request.target_version,
            "triggering rollback pipeline"
        );
        self.post_json(&format!("/projects/{}/rollback", project_id), request, cancel)
            .await
    }

    async fn rerun_workflow(
        &self,
        workflow_id: &str,
        from_failed: bool,
        cancel: &CancellationToken,
    ) -> Result<RerunWorkflowResponse, ApiError> {
        tracing::info!(workflow_id, from_failed, "rerunning workflow");
        let body = serde_json::json!({ "from_failed": from_failed });
        self.post_json(&format!("/workflow/{}/rerun", workflow_id), &body, cancel)
            .await
    }
}
