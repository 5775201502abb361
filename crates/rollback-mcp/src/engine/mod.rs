//! The rollback resolution and execution engine.
//!
//! One invocation is one strict downward pass through the gates:
//!
//! ```text
//! IdentifierCheck → ProjectResolved → [PIPELINE] CapabilityCheck
//!     → ComponentResolved → EnvironmentResolved
//!     → { VersionListing (halt) | Execute (terminal) }
//! ```
//!
//! Every gate either passes silently, halts with a non-error prompt, or
//! terminates with an error. No gate re-enters an earlier one, and nothing
//! is remembered between invocations.

pub mod args;
pub mod error;
pub mod outcome;
pub mod select;

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use rollback_client::{ApiError, CircleCiApi};
use rollback_core::{Component, ComponentVersion, Environment, Project, RollbackRequest, RollbackType};

use crate::protocol::ToolCallResult;

pub use args::RollbackArgs;
pub use error::RollbackError;
pub use outcome::Outcome;
use select::{pick, Pick, Provenance};

/// Guidance returned when a PIPELINE rollback targets a project without a
/// rollback pipeline definition. Deliberately does not suggest trying a
/// different project: rollback configuration is project-specific.
const NO_ROLLBACK_PIPELINE_GUIDANCE: &str =
    "This project has no rollback pipeline configured. To roll back anyway, re-invoke \
     this tool with rollback_type set to \"WORKFLOW_RERUN\" to rerun the workflow that \
     deployed a previous version of the component.";

/// The deployment-rollback engine: resolves an under-specified request and
/// dispatches one of the two execution strategies.
pub struct RollbackEngine {
    api: Arc<dyn CircleCiApi>,
}

impl RollbackEngine {
    /// Create an engine over the given API implementation.
    pub fn new(api: Arc<dyn CircleCiApi>) -> Self {
        Self { api }
    }

    /// Handle one tool call. Never panics and never returns a transport
    /// error; every failure becomes an `isError` tool result.
    pub async fn handle(&self, arguments: Value, cancel: &CancellationToken) -> ToolCallResult {
        // A call without arguments is a valid (maximally incomplete) request.
        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let args: RollbackArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(format!("Invalid arguments: {}", e)),
        };
        self.run(args, cancel).await.into()
    }

    /// Run the gate sequence to its outcome.
    pub async fn run(&self, args: RollbackArgs, cancel: &CancellationToken) -> Outcome {
        match self.gates(args, cancel).await {
            Ok(outcome) => outcome,
            Err(outcome) => outcome,
        }
    }

    /// The linear gate sequence. `Err` carries early halts (prompts and
    /// errors alike) so each gate can bail with `?`.
    async fn gates(
        &self,
        args: RollbackArgs,
        cancel: &CancellationToken,
    ) -> Result<Outcome, Outcome> {
        let project = self.resolve_project(&args, cancel).await?;
        tracing::debug!(project_id = %project.id, org_id = %project.org_id, "project resolved");

        if args.rollback_type == RollbackType::Pipeline {
            if let Some(guidance) = self.check_rollback_capability(&project, cancel).await? {
                return Ok(guidance);
            }
        }

        let components = self
            .api
            .fetch_components(project.id, project.org_id, cancel)
            .await
            .map_err(as_rollback_failure)?;
        let (component, component_prov) =
            match pick(&components, args.component_name.as_deref(), |c| c.name.as_str()) {
                Pick::One(component, prov) => (component.clone(), prov),
                Pick::Empty => return Err(RollbackError::NoComponentsFound.into()),
                Pick::NoMatch => {
                    return Err(RollbackError::InvalidComponentName {
                        name: args.component_name.clone().unwrap_or_default(),
                        valid: components.iter().map(|c| c.name.clone()).collect(),
                    }
                    .into())
                }
                Pick::NeedChoice => return Ok(Outcome::needs_input(component_prompt(&components))),
            };

        let environments = self
            .api
            .fetch_environments(project.org_id, cancel)
            .await
            .map_err(as_rollback_failure)?;
        let (environment, environment_prov) =
            match pick(&environments, args.environment_name.as_deref(), |e| e.name.as_str()) {
                Pick::One(environment, prov) => (environment.clone(), prov),
                Pick::Empty => return Err(RollbackError::NoEnvironmentsFound.into()),
                Pick::NoMatch => {
                    return Err(RollbackError::InvalidEnvironmentName {
                        name: args.environment_name.clone().unwrap_or_default(),
                        valid: environments.iter().map(|e| e.name.clone()).collect(),
                    }
                    .into())
                }
                Pick::NeedChoice => {
                    return Ok(Outcome::needs_input(environment_prompt(&environments)))
                }
            };

        if args.is_complete() {
            self.execute(&args, &project, &component, &environment, cancel)
                .await
        } else {
            self.list_versions(
                &component,
                component_prov,
                &environment,
                environment_prov,
                cancel,
            )
            .await
        }
    }

    /// Gate 1: turn the caller-supplied slug or id into a concrete
    /// `(project_id, org_id)` pair.
    async fn resolve_project(
        &self,
        args: &RollbackArgs,
        cancel: &CancellationToken,
    ) -> Result<Project, Outcome> {
        if let Some(slug) = &args.project_slug {
            let detail = self
                .api
                .get_project(slug, cancel)
                .await
                .map_err(as_resolution_failure)?;
            Ok(Project {
                id: detail.id,
                org_id: detail.organization_id,
                slug: detail.slug.or_else(|| Some(slug.clone())),
            })
        } else if let Some(id) = args.project_id {
            let detail = self
                .api
                .get_project_by_id(id, cancel)
                .await
                .map_err(as_resolution_failure)?;
            Ok(Project {
                id: detail.id,
                org_id: detail.organization_id,
                slug: detail.slug,
            })
        } else {
            Err(RollbackError::MissingIdentifier.into())
        }
    }

    /// Gate 2 (PIPELINE only): confirm a rollback pipeline definition
    /// exists. Returns a soft guidance prompt, not an error, when it does
    /// not.
    async fn check_rollback_capability(
        &self,
        project: &Project,
        cancel: &CancellationToken,
    ) -> Result<Option<Outcome>, Outcome> {
        let settings = self
            .api
            .fetch_deploy_settings(project.id, cancel)
            .await
            .map_err(|e| match e {
                ApiError::Cancelled => Outcome::from(RollbackError::Cancelled),
                other => RollbackError::CapabilityFetch(other.to_string()).into(),
            })?;
        if settings.has_rollback_pipeline() {
            Ok(None)
        } else {
            tracing::info!(project_id = %project.id, "no rollback pipeline configured");
            Ok(Some(Outcome::needs_input(NO_ROLLBACK_PIPELINE_GUIDANCE)))
        }
    }

    /// Terminal prompt step: the request is incomplete, so list the
    /// candidate versions for the resolved pair and halt without executing.
    async fn list_versions(
        &self,
        component: &Component,
        component_prov: Provenance,
        environment: &Environment,
        environment_prov: Provenance,
        cancel: &CancellationToken,
    ) -> Result<Outcome, Outcome> {
        let versions = self
            .api
            .fetch_component_versions(component.id, environment.id, cancel)
            .await
            .map_err(as_rollback_failure)?;

        let listing = serde_json::to_string_pretty(&versions).unwrap_or_default();
        let text = format!(
            "Component: {} ({})\nEnvironment: {} ({})\n\
             {} deployed version(s) found. Re-invoke with environment_name, component_name, \
             current_version and target_version to execute the rollback; for WORKFLOW_RERUN, \
             pass the workflow_id of the version to rerun.\n\n{}",
            component.name,
            component_prov.label(),
            environment.name,
            environment_prov.label(),
            versions.len(),
            listing,
        );
        Ok(Outcome::needs_input(text))
    }

    /// Terminal execution step: dispatch one of the two strategies.
    async fn execute(
        &self,
        args: &RollbackArgs,
        project: &Project,
        component: &Component,
        environment: &Environment,
        cancel: &CancellationToken,
    ) -> Result<Outcome, Outcome> {
        match args.rollback_type {
            RollbackType::Pipeline => {
                self.execute_pipeline(args, project, component, environment, cancel)
                    .await
            }
            RollbackType::WorkflowRerun => self.execute_workflow_rerun(args, cancel).await,
        }
    }

    /// PIPELINE branch: recompute the live version server-side, then
    /// trigger the rollback pipeline.
    async fn execute_pipeline(
        &self,
        args: &RollbackArgs,
        project: &Project,
        component: &Component,
        environment: &Environment,
        cancel: &CancellationToken,
    ) -> Result<Outcome, Outcome> {
        let versions = self
            .api
            .fetch_component_versions(component.id, environment.id, cancel)
            .await
            .map_err(as_rollback_failure)?;

        // The caller-supplied current_version is display-only; the outgoing
        // request always carries the server-observed live version.
        let live = live_version(&versions).ok_or_else(|| {
            Outcome::from(RollbackError::Execution(format!(
                "no live version recorded for component \"{}\" in environment \"{}\"",
                component.name, environment.name
            )))
        })?;

        let request = RollbackRequest {
            environment_name: environment.name.clone(),
            component_name: component.name.clone(),
            current_version: live.name.clone(),
            target_version: args.target_version.clone().unwrap_or_default(),
            namespace: live.namespace.clone(),
            reason: args.reason.clone(),
            parameters: args.parameters.clone(),
        };

        let run = self
            .api
            .run_rollback_pipeline(project.id, &request, cancel)
            .await
            .map_err(as_rollback_failure)?;
        tracing::info!(rollback_id = %run.id, "rollback pipeline triggered");
        Ok(Outcome::done(format!(
            "Rollback initiated successfully. Rollback ID: {} (type: {})",
            run.id, run.rollback_type
        )))
    }

    /// WORKFLOW_RERUN branch: rerun the workflow of the selected version.
    async fn execute_workflow_rerun(
        &self,
        args: &RollbackArgs,
        cancel: &CancellationToken,
    ) -> Result<Outcome, Outcome> {
        let workflow_id = match args.workflow_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => return Err(RollbackError::MissingWorkflowId.into()),
        };

        let rerun = self
            .api
            .rerun_workflow(workflow_id, false, cancel)
            .await
            .map_err(as_rollback_failure)?;
        tracing::info!(workflow_id = %rerun.workflow_id, "workflow rerun triggered");
        Ok(Outcome::done(format!(
            "Workflow rerun initiated successfully. Workflow ID: {}",
            rerun.workflow_id
        )))
    }
}

/// The authoritative current version for a pair: the record with
/// `is_live = true`.
fn live_version(versions: &[ComponentVersion]) -> Option<&ComponentVersion> {
    versions.iter().find(|v| v.is_live)
}

fn component_prompt(components: &[Component]) -> String {
    let mut text = String::from(
        "Multiple components found for this project. Re-invoke with component_name set to one of:\n",
    );
    for component in components {
        text.push_str(&format!("- {} (id: {})\n", component.name, component.id));
    }
    text
}

fn environment_prompt(environments: &[Environment]) -> String {
    let mut text = String::from(
        "Multiple environments found for this organization. Re-invoke with environment_name set to one of:\n",
    );
    for environment in environments {
        text.push_str(&format!("- {} (id: {})\n", environment.name, environment.id));
    }
    text
}

/// Failures outside the gates with dedicated messages fold into the
/// execution-failure text; cancellation keeps its own message.
fn as_rollback_failure(e: ApiError) -> Outcome {
    match e {
        ApiError::Cancelled => RollbackError::Cancelled.into(),
        other => RollbackError::Execution(other.to_string()).into(),
    }
}

fn as_resolution_failure(e: ApiError) -> Outcome {
    match e {
        ApiError::Cancelled => RollbackError::Cancelled.into(),
        other => RollbackError::ProjectResolution(other.to_string()).into(),
    }
}
