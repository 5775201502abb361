//! `rollback tools`: print the tool definitions.

use anyhow::Result;

use rollback_mcp::tools::ToolRegistry;

pub fn run() -> Result<()> {
    let registry = ToolRegistry::with_defaults();
    let definitions: Vec<_> = registry.list();
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}
