//! Registry mapping session ids to their [`ExecutionContext`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::runtime::context::ExecutionContext;

/// Owns one [`ExecutionContext`] per session, created lazily on first use.
#[derive(Default)]
pub struct ContextRegistry {
    contexts: Mutex<HashMap<String, Arc<ExecutionContext>>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session's context, creating it if this is the first call
    /// for that id.
    pub fn get_or_create(&self, session_id: &str) -> Arc<ExecutionContext> {
        let mut contexts = self.contexts.lock().unwrap();
        contexts
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(ExecutionContext::new(session_id)))
            .clone()
    }

    pub fn remove(&self, session_id: &str) {
        self.contexts.lock().unwrap().remove(session_id);
    }

    pub fn clear_all(&self) {
        self.contexts.lock().unwrap().clear();
    }

    pub fn session_count(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }
}
