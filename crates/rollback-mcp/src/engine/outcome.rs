//! Invocation outcomes and their mapping to the MCP result shape.

use crate::protocol::ToolCallResult;

use super::error::RollbackError;

/// How one pass through the gate sequence ended.
#[derive(Debug)]
pub enum Outcome {
    /// The wizard needs another parameter; the text enumerates the options.
    /// Not an error: `isError` stays unset.
    NeedsInput { text: String },

    /// A gate terminated the invocation.
    Failed(RollbackError),

    /// The mutating call succeeded.
    Done { text: String },
}

impl Outcome {
    /// Shorthand for a prompt outcome.
    pub fn needs_input(text: impl Into<String>) -> Self {
        Outcome::NeedsInput { text: text.into() }
    }

    /// Shorthand for a success outcome.
    pub fn done(text: impl Into<String>) -> Self {
        Outcome::Done { text: text.into() }
    }
}

impl From<Outcome> for ToolCallResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::NeedsInput { text } | Outcome::Done { text } => ToolCallResult::text(text),
            Outcome::Failed(err) => ToolCallResult::error(err.to_string()),
        }
    }
}

impl From<RollbackError> for Outcome {
    fn from(err: RollbackError) -> Self {
        Outcome::Failed(err)
    }
}
