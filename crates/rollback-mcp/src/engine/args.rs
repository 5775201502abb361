//! Arguments of the `run_rollback_pipeline` tool.

use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use rollback_core::RollbackType;

/// Caller-supplied parameters for one tool invocation.
///
/// Everything is optional at the schema level; the engine decides per gate
/// which absences prompt and which fail. The wizard state lives entirely in
/// these fields, reconstructed on every call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RollbackArgs {
    #[serde(default, rename = "projectSlug")]
    pub project_slug: Option<String>,

    #[serde(default, rename = "projectID")]
    pub project_id: Option<Uuid>,

    #[serde(default)]
    pub rollback_type: RollbackType,

    #[serde(default)]
    pub workflow_id: Option<String>,

    #[serde(default)]
    pub environment_name: Option<String>,

    #[serde(default)]
    pub component_name: Option<String>,

    #[serde(default)]
    pub current_version: Option<String>,

    #[serde(default)]
    pub target_version: Option<String>,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
}

impl RollbackArgs {
    /// Whether the request carries everything needed to execute.
    ///
    /// All four of environment, component, current and target version must
    /// have been supplied explicitly; auto-selection alone leaves the
    /// request incomplete so the caller still sees the version listing.
    pub fn is_complete(&self) -> bool {
        self.environment_name.is_some()
            && self.component_name.is_some()
            && self.current_version.is_some()
            && self.target_version.is_some()
    }
}
