//! Intent classification types and the [`IntentClassifier`] seam.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::types::Value;

/// The outcome of classifying one piece of user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: String,
    /// Clamped to `[0.0, 1.0]` by every classifier implementation.
    pub confidence: f64,
    /// Extra fields a classifier chooses to surface, copied verbatim into
    /// session variables alongside `intent` and `user_intent`.
    #[serde(default)]
    pub extras: HashMap<String, Value>,
}

impl IntentResult {
    pub fn unknown() -> Self {
        Self {
            intent: "unknown".to_string(),
            confidence: 0.0,
            extras: HashMap::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("request to classifier endpoint failed: {0}")]
    Request(String),

    #[error("classifier response could not be parsed: {0}")]
    MalformedResponse(String),

    #[error("no API key configured for the remote classifier")]
    MissingApiKey,
}

/// Resolves user input to an [`IntentResult`]. Implementations may call out
/// to a remote model ([`crate::classifier::RemoteClassifier`]) or match
/// against a fixed keyword table ([`crate::classifier::MockClassifier`]).
///
/// `candidate_intents`, when given, names the labels a caller already knows
/// are plausible for the current step — a remote classifier can fold them
/// into its prompt; a keyword matcher is free to ignore them.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        user_input: &str,
        candidate_intents: Option<&[String]>,
    ) -> Result<IntentResult, ClassifierError>;
}
