//! Wire types for the CircleCI v2 endpoints the client consumes.
//!
//! Domain entities (Component, Environment, ComponentVersion) live in
//! `rollback-core`; this module only adds the envelope shapes that never
//! leave the client crate's callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response of `GET /project/{slug}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDetail {
    pub id: Uuid,
    pub organization_id: Uuid,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Response of `GET /projects/{id}/deploy-settings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeploySettings {
    #[serde(default)]
    pub rollback_pipeline_definition_id: Option<Uuid>,
}

impl DeploySettings {
    /// Whether a rollback pipeline is configured for the project.
    pub fn has_rollback_pipeline(&self) -> bool {
        self.rollback_pipeline_definition_id.is_some()
    }
}

/// Paginated list envelope used by every CircleCI list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Response of `POST /projects/{id}/rollback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackRun {
    pub id: String,
    pub rollback_type: String,
}

/// Response of `POST /workflow/{id}/rerun`.
#[derive(Debug, Clone, Deserialize)]
pub struct RerunWorkflowResponse {
    pub workflow_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollback_core::Component;

    #[test]
    fn paged_envelope_decodes_without_token() {
        let page: Paged<Component> = serde_json::from_str(
            r#"{"items": [{"id": "7f3f6bbc-52e9-49c5-b423-6dd2bea9b7e8", "name": "backend"}]}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "backend");
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn deploy_settings_may_be_empty() {
        let settings: DeploySettings = serde_json::from_str("{}").unwrap();
        assert!(!settings.has_rollback_pipeline());
    }

    #[test]
    fn project_detail_decodes() {
        let detail: ProjectDetail = serde_json::from_str(
            r#"{
                "id": "c124cca6-d03e-4733-b84d-32b02347b78c",
                "organization_id": "8e0f4b2f-27a1-4da9-9db0-a9b01c2e7cf1",
                "slug": "gh/org/repo"
            }"#,
        )
        .unwrap();
        assert_eq!(detail.slug.as_deref(), Some("gh/org/repo"));
    }
}
