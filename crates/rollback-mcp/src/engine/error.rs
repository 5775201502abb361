//! Terminal failures of the rollback engine.
//!
//! Every variant ends an invocation with `isError: true`. Enumeration
//! prompts and the missing-rollback-pipeline guidance are not errors and
//! live in [`super::Outcome::NeedsInput`] instead.

use thiserror::Error;

/// Why a rollback invocation terminated unsuccessfully.
#[derive(Debug, Error)]
pub enum RollbackError {
    /// Neither identifier supplied.
    #[error("projectSlug or projectID is required.")]
    MissingIdentifier,

    /// Project lookup failed.
    #[error("Failed to resolve project: {0}")]
    ProjectResolution(String),

    /// Deploy settings could not be fetched for the capability check.
    #[error("Failed to fetch rollback pipeline definition: {0}")]
    CapabilityFetch(String),

    /// The project tracks no components at all.
    #[error(
        "No components found for this project. Configure deploy markers so CircleCI \
         can track what is deployed where: https://circleci.com/docs/deploy/configure-deploy-markers/"
    )]
    NoComponentsFound,

    /// An explicit component name matched nothing.
    #[error("Component \"{name}\" not found. Valid components: {}", valid.join(", "))]
    InvalidComponentName { name: String, valid: Vec<String> },

    /// The organization has no environments.
    #[error("No environments found for this organization.")]
    NoEnvironmentsFound,

    /// An explicit environment name matched nothing.
    #[error("Environment \"{name}\" not found. Valid environments: {}", valid.join(", "))]
    InvalidEnvironmentName { name: String, valid: Vec<String> },

    /// WORKFLOW_RERUN without a workflow to rerun.
    #[error(
        "The selected version has no associated workflow. Choose a different version \
         from the listing and pass its workflow_id."
    )]
    MissingWorkflowId,

    /// The mutating call (either branch) failed.
    #[error("Failed to initiate rollback: {0}")]
    Execution(String),

    /// The caller aborted the invocation.
    #[error("Rollback request cancelled.")]
    Cancelled,
}
