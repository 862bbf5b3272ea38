//! [`SessionDriver`]: the only component aware of sessions. Combines a
//! [`ContextRegistry`] with a shared [`Interpreter`] and exposes the two
//! operations a host (the CLI, a future network service) actually needs:
//! starting a fresh conversation and feeding it the next line of input.

use std::sync::Arc;

use crate::interpreter::{InterpretResult, Interpreter};
use crate::runtime::registry::ContextRegistry;

/// Thin façade driving one script across many independent sessions. Cheap
/// to clone and share: both fields are already reference-counted.
#[derive(Clone)]
pub struct SessionDriver {
    interpreter: Arc<Interpreter>,
    registry: Arc<ContextRegistry>,
}

impl SessionDriver {
    pub fn new(interpreter: Interpreter) -> Self {
        Self {
            interpreter: Arc::new(interpreter),
            registry: Arc::new(ContextRegistry::new()),
        }
    }

    /// Clears any prior state for `user_id` and runs the script from the
    /// top, returning whatever the first pause point produces (typically
    /// the opening `speak` lines up to the first `listen`).
    pub async fn start_conversation(&self, user_id: &str) -> InterpretResult {
        let context = self.registry.get_or_create(user_id);
        context.clear();
        self.run(user_id, None).await
    }

    /// Feeds `input` (if any) to `user_id`'s session and advances it to the
    /// next pause point. Passing `None` re-drives a session that returned
    /// `waiting_input` without supplying new input, which is idempotent:
    /// the pending-input slot stays empty, so the same `waiting_input`
    /// result comes back.
    pub async fn process_input(&self, user_id: &str, input: Option<&str>) -> InterpretResult {
        self.run(user_id, input).await
    }

    async fn run(&self, user_id: &str, input: Option<&str>) -> InterpretResult {
        let context = self.registry.get_or_create(user_id);
        if let Some(text) = input {
            context.set_pending_input(text);
        }
        self.interpreter.execute(&context)
    }

    pub fn registry(&self) -> &Arc<ContextRegistry> {
        &self.registry
    }
}
