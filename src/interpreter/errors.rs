//! Interpreter errors
//!
//! Unlike [`crate::parser::types::ParseException`], which rejects malformed
//! source before a script ever runs, these are raised while walking an
//! already-valid AST: they represent state the parser cannot see, such as
//! an execution context stuck in an inconsistent place or a recursion bound
//! exceeded by a script that jumps in a cycle.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("step '{0}' does not exist")]
    UnknownStep(String),

    #[error("the script has no steps to execute")]
    EmptyScript,

    #[error("recursion limit of {limit} steps exceeded starting at '{start_step}', possible infinite loop")]
    RecursionLimitExceeded { limit: u32, start_step: String },

    #[error("no current step set for session '{0}'")]
    NoCurrentStep(String),
}

impl InterpreterError {
    /// Short machine-readable token carried on `InterpretResult::error`
    /// alongside the human-readable `Display` message (§7).
    pub fn token(&self) -> &'static str {
        match self {
            Self::UnknownStep(_) => "UnknownStep",
            Self::EmptyScript => "EmptyScript",
            Self::RecursionLimitExceeded { .. } => "RecursionLimitExceeded",
            Self::NoCurrentStep(_) => "NoCurrentStep",
        }
    }
}
