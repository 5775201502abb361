//! The seam between the resolution engine and the CircleCI wire.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use rollback_core::{Component, ComponentVersion, Environment, RollbackRequest};

use crate::error::ApiError;
use crate::types::{DeploySettings, ProjectDetail, RerunWorkflowResponse, RollbackRun};

/// The CircleCI operations the rollback engine depends on.
///
/// Implemented by [`crate::CircleCiClient`] over HTTP and by mocks in engine
/// tests. Every method takes the caller's cancellation token so an aborted
/// tool call stops at the next network boundary.
#[async_trait]
pub trait CircleCiApi: Send + Sync {
    /// `GET /project/{slug}`: resolve a project slug to its id and org.
    async fn get_project(
        &self,
        slug: &str,
        cancel: &CancellationToken,
    ) -> Result<ProjectDetail, ApiError>;

    /// `GET /project/{id}`: recover the org id for a known project id.
    async fn get_project_by_id(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<ProjectDetail, ApiError>;

    /// `GET /projects/{id}/deploy-settings`.
    async fn fetch_deploy_settings(
        &self,
        project_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<DeploySettings, ApiError>;

    /// `GET /projects/{id}/components`: all components, pages followed.
    async fn fetch_components(
        &self,
        project_id: Uuid,
        org_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<Component>, ApiError>;

    /// `GET /organizations/{org_id}/environments`: all environments.
    async fn fetch_environments(
        &self,
        org_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<Environment>, ApiError>;

    /// `GET /deploy/component-versions` for a (component, environment) pair.
    async fn fetch_component_versions(
        &self,
        component_id: Uuid,
        environment_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<ComponentVersion>, ApiError>;

    /// `POST /projects/{id}/rollback`: trigger the rollback pipeline.
    async fn run_rollback_pipeline(
        &self,
        project_id: Uuid,
        request: &RollbackRequest,
        cancel: &CancellationToken,
    ) -> Result<RollbackRun, ApiError>;

    /// `POST /workflow/{id}/rerun`.
    async fn rerun_workflow(
        &self,
        workflow_id: &str,
        from_failed: bool,
        cancel: &CancellationToken,
    ) -> Result<RerunWorkflowResponse, ApiError>;
}
