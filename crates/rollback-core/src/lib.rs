use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Configuration types shared across all rollback crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{
    ApiConfig, ConfigError, McpConfig, RetryConfig, RollbackConfig, Transport,
};

/// A CircleCI project, resolved once per invocation from a slug or a UUID.
///
/// The `(id, org_id)` pair is what every downstream deploy call needs; the
/// slug is kept only for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub org_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A deployable unit within a project, tracked via deploy markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub name: String,
}

/// A named deployment target (production, staging, ...) scoped to an org.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: Uuid,
    pub name: String,
}

/// One historical or current deployment record for a (component, environment)
/// pair. Exactly one version per pair should have `is_live = true`; that
/// record is the authoritative "current version".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentVersion {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub environment_id: Uuid,
    pub is_live: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deployed_at: Option<DateTime<Utc>>,
}

impl ComponentVersion {
    /// Whether this record has a workflow that can be rerun.
    pub fn has_workflow(&self) -> bool {
        self.workflow_id.as_deref().is_some_and(|w| !w.is_empty())
    }
}

/// Payload for the pipeline-rollback API. Constructed in memory per
/// invocation and discarded after the execution call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackRequest {
    pub environment_name: String,
    pub component_name: String,
    pub current_version: String,
    pub target_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Which execution strategy the rollback tool dispatches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollbackType {
    #[default]
    Pipeline,
    WorkflowRerun,
}

impl std::fmt::Display for RollbackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RollbackType::Pipeline => write!(f, "PIPELINE"),
            RollbackType::WorkflowRerun => write!(f, "WORKFLOW_RERUN"),
        }
    }
}
