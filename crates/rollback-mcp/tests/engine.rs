//! Engine tests against a mock CircleCI API.
//!
//! Each test drives one pass through the gate sequence and checks the
//! resulting `{content, isError?}` shape, mirroring how an agent experiences
//! the tool across re-invocations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use rollback_client::{
    ApiError, CircleCiApi, DeploySettings, ProjectDetail, RerunWorkflowResponse, RollbackRun,
};
use rollback_core::{Component, ComponentVersion, Environment, RollbackRequest};
use rollback_mcp::RollbackEngine;

const PROJECT_ID: &str = "c124cca6-d03e-4733-b84d-32b02347b78c";
const ORG_ID: &str = "8e0f4b2f-27a1-4da9-9db0-a9b01c2e7cf1";

struct MockApi {
    fail_project: Option<String>,
    rollback_pipeline_configured: bool,
    fail_deploy_settings: bool,
    components: Vec<Component>,
    environments: Vec<Environment>,
    versions: Vec<ComponentVersion>,
    fail_rollback: Option<String>,
    fail_rerun: Option<String>,
    rollback_calls: Mutex<Vec<(Uuid, RollbackRequest)>>,
    rerun_calls: Mutex<Vec<(String, bool)>>,
}

impl MockApi {
    fn new() -> Self {
        Self {
            fail_project: None,
            rollback_pipeline_configured: true,
            fail_deploy_settings: false,
            components: vec![component("backend")],
            environments: vec![environment("production")],
            versions: vec![version("1.1.0", true, Some("workflow-live")),
                           version("0.9.0", false, Some("workflow-old"))],
            fail_rollback: None,
            fail_rerun: None,
            rollback_calls: Mutex::new(Vec::new()),
            rerun_calls: Mutex::new(Vec::new()),
        }
    }

    fn engine(self) -> RollbackEngine {
        RollbackEngine::new(Arc::new(self))
    }
}

fn component(name: &str) -> Component {
    Component { id: Uuid::new_v4(), name: name.to_string() }
}

fn environment(name: &str) -> Environment {
    Environment { id: Uuid::new_v4(), name: name.to_string() }
}

fn version(name: &str, is_live: bool, workflow_id: Option<&str>) -> ComponentVersion {
    ComponentVersion {
        name: name.to_string(),
        namespace: Some("default".to_string()),
        environment_id: Uuid::nil(),
        is_live,
        pipeline_id: None,
        workflow_id: workflow_id.map(str::to_string),
        job_id: None,
        job_number: None,
        last_deployed_at: None,
    }
}

fn status_error(status: u16, body: &str) -> ApiError {
    ApiError::Status { status, body: body.to_string() }
}

#[async_trait]
impl CircleCiApi for MockApi {
    async fn get_project(
        &self,
        slug: &str,
        _cancel: &CancellationToken,
    ) -> Result<ProjectDetail, ApiError> {
        if let Some(message) = &self.fail_project {
            return Err(status_error(404, message));
        }
        Ok(ProjectDetail {
            id: PROJECT_ID.parse().unwrap(),
            organization_id: ORG_ID.parse().unwrap(),
            slug: Some(slug.to_string()),
        })
    }

    async fn get_project_by_id(
        &self,
        id: Uuid,
        _cancel: &CancellationToken,
    ) -> Result<ProjectDetail, ApiError> {
        if let Some(message) = &self.fail_project {
            return Err(status_error(404, message));
        }
        Ok(ProjectDetail {
            id,
            organization_id: ORG_ID.parse().unwrap(),
            slug: None,
        })
    }

    async fn fetch_deploy_settings(
        &self,
        _project_id: Uuid,
        _cancel: &CancellationToken,
    ) -> Result<DeploySettings, ApiError> {
        if self.fail_deploy_settings {
            return Err(status_error(500, "settings unavailable"));
        }
        Ok(DeploySettings {
            rollback_pipeline_definition_id: self
                .rollback_pipeline_configured
                .then(Uuid::new_v4),
        })
    }

    async fn fetch_components(
        &self,
        _project_id: Uuid,
        _org_id: Uuid,
        _cancel: &CancellationToken,
    ) -> Result<Vec<Component>, ApiError> {
        Ok(self.components.clone())
    }

    async fn fetch_environments(
        &self,
        _org_id: Uuid,
        _cancel: &CancellationToken,
    ) -> Result<Vec<Environment>, ApiError> {
        Ok(self.environments.clone())
    }

    async fn fetch_component_versions(
        &self,
        _component_id: Uuid,
        _environment_id: Uuid,
        _cancel: &CancellationToken,
    ) -> Result<Vec<ComponentVersion>, ApiError> {
        Ok(self.versions.clone())
    }

    async fn run_rollback_pipeline(
        &self,
        project_id: Uuid,
        request: &RollbackRequest,
        _cancel: &CancellationToken,
    ) -> Result<RollbackRun, ApiError> {
        if let Some(message) = &self.fail_rollback {
            return Err(status_error(500, message));
        }
        self.rollback_calls
            .lock()
            .unwrap()
            .push((project_id, request.clone()));
        Ok(RollbackRun {
            id: "rollback-123".to_string(),
            rollback_type: "PIPELINE".to_string(),
        })
    }

    async fn rerun_workflow(
        &self,
        workflow_id: &str,
        from_failed: bool,
        _cancel: &CancellationToken,
    ) -> Result<RerunWorkflowResponse, ApiError> {
        if let Some(message) = &self.fail_rerun {
            return Err(status_error(500, message));
        }
        self.rerun_calls
            .lock()
            .unwrap()
            .push((workflow_id.to_string(), from_failed));
        Ok(RerunWorkflowResponse {
            workflow_id: workflow_id.to_string(),
        })
    }
}

fn cancel() -> CancellationToken {
    CancellationToken::new()
}

#[tokio::test]
async fn missing_both_identifiers_is_an_error() {
    let engine = MockApi::new().engine();
    let result = engine.handle(json!({}), &cancel()).await;
    assert!(result.is_error());
    assert!(result
        .text_content()
        .contains("projectSlug or projectID is required."));
}

#[tokio::test]
async fn project_resolution_failure_carries_the_underlying_message() {
    let mut api = MockApi::new();
    api.fail_project = Some("no such project".to_string());
    let engine = api.engine();
    let result = engine
        .handle(json!({"projectSlug": "gh/org/missing"}), &cancel())
        .await;
    assert!(result.is_error());
    let text = result.text_content();
    assert!(text.contains("Failed to resolve project"));
    assert!(text.contains("no such project"));
}

#[tokio::test]
async fn single_component_and_environment_skip_straight_to_version_listing() {
    let engine = MockApi::new().engine();
    let result = engine
        .handle(json!({"projectSlug": "gh/org/repo"}), &cancel())
        .await;
    assert!(!result.is_error());
    let text = result.text_content();
    // No selection prompt for either entity
    assert!(!text.contains("Re-invoke with component_name set to one of"));
    assert!(!text.contains("Re-invoke with environment_name set to one of"));
    // Version listing with provenance and the workflow ids surfaced
    assert!(text.contains("backend (auto-selected)"));
    assert!(text.contains("production (auto-selected)"));
    assert!(text.contains("1.1.0"));
    assert!(text.contains("workflow-live"));
}

#[tokio::test]
async fn multiple_components_without_name_prompt_without_error() {
    let mut api = MockApi::new();
    api.components = vec![component("backend"), component("worker")];
    let engine = api.engine();
    let result = engine
        .handle(json!({"projectSlug": "gh/org/repo"}), &cancel())
        .await;
    assert!(!result.is_error());
    let text = result.text_content();
    assert!(text.contains("Re-invoke with component_name set to one of"));
    assert!(text.contains("backend"));
    assert!(text.contains("worker"));
}

#[tokio::test]
async fn invalid_component_name_lists_valid_ones() {
    let mut api = MockApi::new();
    api.components = vec![component("backend"), component("worker")];
    let engine = api.engine();
    let result = engine
        .handle(
            json!({"projectSlug": "gh/org/repo", "component_name": "frontend"}),
            &cancel(),
        )
        .await;
    assert!(result.is_error());
    let text = result.text_content();
    assert!(text.contains("\"frontend\" not found"));
    assert!(text.contains("backend"));
    assert!(text.contains("worker"));
}

#[tokio::test]
async fn zero_components_is_terminal_with_deploy_marker_pointer() {
    let mut api = MockApi::new();
    api.components = Vec::new();
    let engine = api.engine();
    let result = engine
        .handle(json!({"projectSlug": "gh/org/repo"}), &cancel())
        .await;
    assert!(result.is_error());
    assert!(result.text_content().contains("deploy markers"));
}

#[tokio::test]
async fn missing_rollback_pipeline_recommends_workflow_rerun_without_error() {
    let mut api = MockApi::new();
    api.rollback_pipeline_configured = false;
    let engine = api.engine();
    let result = engine
        .handle(json!({"projectSlug": "gh/org/repo"}), &cancel())
        .await;
    assert!(!result.is_error());
    let text = result.text_content();
    assert!(text.contains("WORKFLOW_RERUN"));
    // Never suggests trying a different project
    assert!(!text.to_lowercase().contains("different project"));
}

#[tokio::test]
async fn capability_check_is_skipped_for_workflow_rerun() {
    let mut api = MockApi::new();
    // Would fail the capability gate if it were consulted
    api.fail_deploy_settings = true;
    let engine = api.engine();
    let result = engine
        .handle(
            json!({"projectSlug": "gh/org/repo", "rollback_type": "WORKFLOW_RERUN"}),
            &cancel(),
        )
        .await;
    // Proceeds to the version listing instead of failing
    assert!(!result.is_error());
    assert!(result.text_content().contains("backend (auto-selected)"));
}

#[tokio::test]
async fn capability_fetch_failure_is_terminal_for_pipeline() {
    let mut api = MockApi::new();
    api.fail_deploy_settings = true;
    let engine = api.engine();
    let result = engine
        .handle(json!({"projectSlug": "gh/org/repo"}), &cancel())
        .await;
    assert!(result.is_error());
    assert!(result
        .text_content()
        .contains("Failed to fetch rollback pipeline definition"));
}

#[tokio::test]
async fn pipeline_execution_uses_the_server_observed_live_version() {
    let api = Arc::new(MockApi::new());
    let engine = RollbackEngine::new(api.clone());

    let result = engine
        .handle(
            json!({
                "projectSlug": "gh/org/repo",
                "environment_name": "production",
                "component_name": "backend",
                "current_version": "1.0.0",
                "target_version": "0.9.0",
                "reason": "Critical bug fix",
                "rollback_type": "PIPELINE"
            }),
            &cancel(),
        )
        .await;

    assert!(!result.is_error());
    let text = result.text_content();
    assert!(text.contains("Rollback initiated successfully"));
    assert!(text.contains("rollback-123"));

    let calls = api.rollback_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (project_id, request) = &calls[0];
    assert_eq!(project_id.to_string(), PROJECT_ID);
    assert_eq!(request.environment_name, "production");
    assert_eq!(request.component_name, "backend");
    // Caller said 1.0.0; the live record says 1.1.0 and wins.
    assert_eq!(request.current_version, "1.1.0");
    assert_eq!(request.target_version, "0.9.0");
    assert_eq!(request.namespace.as_deref(), Some("default"));
    assert_eq!(request.reason.as_deref(), Some("Critical bug fix"));
}

#[tokio::test]
async fn workflow_rerun_executes_with_from_failed_false() {
    let api = Arc::new(MockApi::new());
    let engine = RollbackEngine::new(api.clone());

    let result = engine
        .handle(
            json!({
                "projectSlug": "gh/org/repo",
                "environment_name": "production",
                "component_name": "backend",
                "current_version": "1.0.0",
                "target_version": "0.9.0",
                "rollback_type": "WORKFLOW_RERUN",
                "workflow_id": "workflow-1"
            }),
            &cancel(),
        )
        .await;

    assert!(!result.is_error());
    assert!(result
        .text_content()
        .contains("Workflow rerun initiated successfully"));

    let calls = api.rerun_calls.lock().unwrap();
    assert_eq!(calls.as_slice(), &[("workflow-1".to_string(), false)]);
}

#[tokio::test]
async fn workflow_rerun_without_workflow_id_is_terminal() {
    let engine = MockApi::new().engine();
    let result = engine
        .handle(
            json!({
                "projectSlug": "gh/org/repo",
                "environment_name": "production",
                "component_name": "backend",
                "current_version": "1.0.0",
                "target_version": "0.9.0",
                "rollback_type": "WORKFLOW_RERUN"
            }),
            &cancel(),
        )
        .await;
    assert!(result.is_error());
    assert!(result.text_content().contains("has no associated workflow"));
}

#[tokio::test]
async fn pipeline_api_failure_surfaces_the_underlying_message() {
    let mut api = MockApi::new();
    api.fail_rollback = Some("definition disabled".to_string());
    let engine = api.engine();
    let result = engine
        .handle(
            json!({
                "projectSlug": "gh/org/repo",
                "environment_name": "production",
                "component_name": "backend",
                "current_version": "1.0.0",
                "target_version": "0.9.0"
            }),
            &cancel(),
        )
        .await;
    assert!(result.is_error());
    let text = result.text_content();
    assert!(text.contains("Failed to initiate rollback"));
    assert!(text.contains("definition disabled"));
}

#[tokio::test]
async fn rerun_api_failure_surfaces_the_underlying_message() {
    let mut api = MockApi::new();
    api.fail_rerun = Some("workflow gone".to_string());
    let engine = api.engine();
    let result = engine
        .handle(
            json!({
                "projectSlug": "gh/org/repo",
                "environment_name": "production",
                "component_name": "backend",
                "current_version": "1.0.0",
                "target_version": "0.9.0",
                "rollback_type": "WORKFLOW_RERUN",
                "workflow_id": "workflow-1"
            }),
            &cancel(),
        )
        .await;
    assert!(result.is_error());
    let text = result.text_content();
    assert!(text.contains("Failed to initiate rollback"));
    assert!(text.contains("workflow gone"));
}

#[tokio::test]
async fn explicit_names_are_reported_as_specified_in_the_listing() {
    let mut api = MockApi::new();
    api.components = vec![component("backend"), component("worker")];
    let engine = api.engine();
    let result = engine
        .handle(
            json!({"projectSlug": "gh/org/repo", "component_name": "worker"}),
            &cancel(),
        )
        .await;
    assert!(!result.is_error());
    let text = result.text_content();
    assert!(text.contains("worker (specified)"));
    assert!(text.contains("production (auto-selected)"));
}

#[tokio::test]
async fn no_live_version_fails_the_pipeline_branch() {
    let mut api = MockApi::new();
    api.versions = vec![version("0.9.0", false, None)];
    let engine = api.engine();
    let result = engine
        .handle(
            json!({
                "projectSlug": "gh/org/repo",
                "environment_name": "production",
                "component_name": "backend",
                "current_version": "1.0.0",
                "target_version": "0.9.0"
            }),
            &cancel(),
        )
        .await;
    assert!(result.is_error());
    assert!(result.text_content().contains("no live version"));
}

#[tokio::test]
async fn cancelled_token_stops_the_invocation() {
    // The client layer raises Cancelled when the token fires; the engine
    // must surface it as an error outcome instead of continuing the gates.
    struct CancelledApi;
    #[async_trait]
    impl CircleCiApi for CancelledApi {
        async fn get_project(
            &self,
            _slug: &str,
            _cancel: &CancellationToken,
        ) -> Result<ProjectDetail, ApiError> {
            Err(ApiError::Cancelled)
        }
        async fn get_project_by_id(
            &self,
            _id: Uuid,
            _cancel: &CancellationToken,
        ) -> Result<ProjectDetail, ApiError> {
            Err(ApiError::Cancelled)
        }
        async fn fetch_deploy_settings(
            &self,
            _project_id: Uuid,
            _cancel: &CancellationToken,
        ) -> Result<DeploySettings, ApiError> {
            Err(ApiError::Cancelled)
        }
        async fn fetch_components(
            &self,
            _project_id: Uuid,
            _org_id: Uuid,
            _cancel: &CancellationToken,
        ) -> Result<Vec<Component>, ApiError> {
            Err(ApiError::Cancelled)
        }
        async fn fetch_environments(
            &self,
            _org_id: Uuid,
            _cancel: &CancellationToken,
        ) -> Result<Vec<Environment>, ApiError> {
            Err(ApiError::Cancelled)
        }
        async fn fetch_component_versions(
            &self,
            _component_id: Uuid,
            _environment_id: Uuid,
            _cancel: &CancellationToken,
        ) -> Result<Vec<ComponentVersion>, ApiError> {
            Err(ApiError::Cancelled)
        }
        async fn run_rollback_pipeline(
            &self,
            _project_id: Uuid,
            _request: &RollbackRequest,
            _cancel: &CancellationToken,
        ) -> Result<RollbackRun, ApiError> {
            Err(ApiError::Cancelled)
        }
        async fn rerun_workflow(
            &self,
            _workflow_id: &str,
            _from_failed: bool,
            _cancel: &CancellationToken,
        ) -> Result<RerunWorkflowResponse, ApiError> {
            Err(ApiError::Cancelled)
        }
    }

    let engine = RollbackEngine::new(Arc::new(CancelledApi));
    let result = engine
        .handle(json!({"projectSlug": "gh/org/repo"}), &CancellationToken::new())
        .await;
    assert!(result.is_error());
    assert!(result.text_content().contains("cancelled"));
}
