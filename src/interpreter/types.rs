//! Interpreter types
//!
//! Types describing the outcome of running a script to its next pause
//! point. These are serde-serializable so a session driver can hand one
//! straight back to a caller as JSON.

use serde::{Deserialize, Serialize};

/// Where execution stands after a call to [`crate::interpreter::Interpreter::execute`].
/// `Running` never escapes `execute` itself (the interpreter loops through
/// it internally); it is part of the contract because a session driver may
/// surface it for an in-between step before the next pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecStatus {
    Running,
    /// A `listen` statement is blocking further progress; waiting for input.
    WaitingInput,
    /// Execution reached an `end` statement or fell off the last statement
    /// of a step with no further branch.
    Finished,
    /// Execution cannot continue: an undefined step, an empty script, or a
    /// recursion bound exceeded.
    Error,
}

/// The result of driving a script forward by one call to `execute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretResult {
    pub status: ExecStatus,
    /// All `speak` messages accumulated since the last pause, joined in order.
    pub message: String,
    /// Set when a branch has just redirected execution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
    /// Set on `waiting_input`: the variable the pending `listen` will fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Set on `error`: a short machine-readable diagnostic token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InterpretResult {
    pub fn finished(message: impl Into<String>) -> Self {
        Self { status: ExecStatus::Finished, message: message.into(), next_step: None, variable: None, error: None }
    }

    pub fn waiting_input(message: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            status: ExecStatus::WaitingInput,
            message: message.into(),
            next_step: None,
            variable: Some(variable.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: ExecStatus::Error,
            message: message.into(),
            next_step: None,
            variable: None,
            error: Some(error.into()),
        }
    }
}

/// Bounds enforced while walking steps within a single `execute` call, to
/// guard against scripts whose branches form a cycle with no `listen` or
/// `end` in between.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionLimits {
    pub max_recursion_depth: u32,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self { max_recursion_depth: 100 }
    }
}
