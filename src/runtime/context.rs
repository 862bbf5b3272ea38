//! Per-session execution state.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::ast::types::Value;

#[derive(Debug, Default)]
struct ContextState {
    variables: HashMap<String, Value>,
    current_step: Option<String>,
    statement_index: usize,
    pending_input: Option<String>,
    input_used: bool,
}

/// The independent execution state for a single conversation. Cheap to
/// create, safe to share across threads behind an `Arc`: every accessor
/// takes the lock for the duration of one field read or write.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    session_id: String,
    state: Mutex<ContextState>,
}

impl ExecutionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            state: Mutex::new(ContextState::default()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn set_variable(&self, name: impl Into<String>, value: Value) {
        self.state.lock().unwrap().variables.insert(name.into(), value);
    }

    pub fn get_variable(&self, name: &str) -> Option<Value> {
        self.state.lock().unwrap().variables.get(name).cloned()
    }

    pub fn get_current_step(&self) -> Option<String> {
        self.state.lock().unwrap().current_step.clone()
    }

    pub fn set_current_step(&self, step_name: impl Into<String>) {
        self.state.lock().unwrap().current_step = Some(step_name.into());
    }

    pub fn get_statement_index(&self) -> usize {
        self.state.lock().unwrap().statement_index
    }

    pub fn set_statement_index(&self, index: usize) {
        self.state.lock().unwrap().statement_index = index;
    }

    /// Queues input for the next `listen` statement to pick up.
    pub fn set_pending_input(&self, user_input: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.pending_input = Some(user_input.into());
        state.input_used = false;
    }

    /// Returns the queued input exactly once; subsequent calls return `None`
    /// until `set_pending_input` is called again.
    pub fn get_and_consume_input(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        if state.input_used {
            return None;
        }
        if let Some(input) = state.pending_input.clone() {
            state.input_used = true;
            Some(input)
        } else {
            None
        }
    }

    /// Resets all state, as though the session had never run.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.variables.clear();
        state.current_step = None;
        state.statement_index = 0;
        state.pending_input = None;
        state.input_used = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_round_trip() {
        let ctx = ExecutionContext::new("u1");
        ctx.set_variable("order_id", Value::String("123".to_string()));
        assert_eq!(ctx.get_variable("order_id"), Some(Value::String("123".to_string())));
        assert_eq!(ctx.get_variable("missing"), None);
    }

    #[test]
    fn pending_input_is_consumed_exactly_once() {
        let ctx = ExecutionContext::new("u1");
        ctx.set_pending_input("hello");
        assert_eq!(ctx.get_and_consume_input(), Some("hello".to_string()));
        assert_eq!(ctx.get_and_consume_input(), None);
    }

    #[test]
    fn clear_resets_everything() {
        let ctx = ExecutionContext::new("u1");
        ctx.set_variable("x", Value::Int(1));
        ctx.set_current_step("start");
        ctx.set_statement_index(2);
        ctx.set_pending_input("hi");
        ctx.clear();
        assert_eq!(ctx.get_variable("x"), None);
        assert_eq!(ctx.get_current_step(), None);
        assert_eq!(ctx.get_statement_index(), 0);
        assert_eq!(ctx.get_and_consume_input(), None);
    }
}
