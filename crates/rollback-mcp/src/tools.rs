//! Tool registry and the `run_rollback_pipeline` tool definition.

use serde_json::{json, Value};
use std::collections::HashMap;

use crate::protocol::ToolDefinition;

/// Name of the rollback tool.
pub const ROLLBACK_TOOL: &str = "run_rollback_pipeline";

/// Registry of available MCP tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the rollback tool registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(rollback_tool_definition());
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: ToolDefinition) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tools.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Build the `run_rollback_pipeline` tool definition.
pub fn rollback_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: ROLLBACK_TOOL.to_string(),
        description: Some(
            "Roll back a CircleCI deployment. Call with a projectSlug or projectID; \
             the tool resolves the component, environment and version step by step, \
             prompting for whichever parameter is still missing, then triggers either \
             the project's rollback pipeline or a workflow rerun."
                .to_string(),
        ),
        input_schema: rollback_input_schema(),
    }
}

fn rollback_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "projectSlug": {
                "type": "string",
                "description": "Project slug, e.g. gh/org/repo. Either this or projectID is required."
            },
            "projectID": {
                "type": "string",
                "format": "uuid",
                "description": "Project UUID. Either this or projectSlug is required."
            },
            "rollback_type": {
                "type": "string",
                "enum": ["PIPELINE", "WORKFLOW_RERUN"],
                "default": "PIPELINE",
                "description": "Execution strategy: dedicated rollback pipeline or rerun of a previous deployment's workflow."
            },
            "workflow_id": {
                "type": "string",
                "description": "Workflow to rerun (WORKFLOW_RERUN only); taken from the version listing."
            },
            "environment_name": {
                "type": "string",
                "description": "Deployment environment, e.g. production."
            },
            "component_name": {
                "type": "string",
                "description": "Component to roll back."
            },
            "current_version": {
                "type": "string",
                "description": "Version currently deployed."
            },
            "target_version": {
                "type": "string",
                "description": "Version to roll back to."
            },
            "reason": {
                "type": "string",
                "description": "Reason for the rollback, recorded with the pipeline run."
            },
            "parameters": {
                "type": "object",
                "description": "Extra pipeline parameters passed through to the rollback pipeline.",
                "additionalProperties": true
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_contains_rollback_tool() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(ROLLBACK_TOOL));
        assert!(!registry.is_empty());
    }

    #[test]
    fn schema_covers_every_parameter() {
        let definition = rollback_tool_definition();
        let properties = &definition.input_schema["properties"];
        for key in [
            "projectSlug",
            "projectID",
            "rollback_type",
            "workflow_id",
            "environment_name",
            "component_name",
            "current_version",
            "target_version",
            "reason",
            "parameters",
        ] {
            assert!(properties.get(key).is_some(), "missing property {key}");
        }
        // Neither identifier is individually required
        assert!(definition.input_schema.get("required").is_none());
    }
}
