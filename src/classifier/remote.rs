//! Remote classifier backed by an OpenAI-chat-completions-compatible endpoint.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::classifier::types::{ClassifierError, IntentClassifier, IntentResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const SYSTEM_PROMPT: &str = "You are a professional intent classification assistant. \
Analyze the user's input, identify their intent, and return the result as JSON.";

/// Calls a chat-completions endpoint with a prompt asking for a JSON-shaped
/// intent classification, then falls back to plain keyword extraction if
/// the model's response isn't valid JSON.
pub struct RemoteClassifier {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl RemoteClassifier {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.into(),
        }
    }

    fn build_prompt(&self, user_input: &str, candidate_intents: Option<&[String]>) -> String {
        let mut prompt = format!("User input: {}\n\n", user_input);
        if let Some(intents) = candidate_intents.filter(|i| !i.is_empty()) {
            prompt.push_str(&format!("Possible intents: {}\n\n", intents.join(", ")));
        }
        prompt.push_str(
            "Analyze the user's intent and return it as JSON in this shape:\n\
            {\n  \"intent\": \"intent name\",\n  \"confidence\": a float between 0.0 and 1.0,\n  \
            \"entities\": {\n    \"key\": \"value\"\n  }\n}\n\n\
            If the intent cannot be determined, set intent to \"unknown\".",
        );
        prompt
    }
}

#[async_trait]
impl IntentClassifier for RemoteClassifier {
    async fn classify(&self, user_input: &str, candidate_intents: Option<&[String]>) -> Result<IntentResult, ClassifierError> {
        if self.api_key.is_empty() {
            return Err(ClassifierError::MissingApiKey);
        }

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": self.build_prompt(user_input, candidate_intents)},
            ],
            "temperature": 0.3,
            "max_tokens": 200,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::Request(format!(
                "classifier endpoint returned status {}",
                response.status()
            )));
        }

        let payload: JsonValue = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ClassifierError::MalformedResponse("missing choices[0].message.content".to_string()))?
            .trim()
            .to_string();

        let parsed = serde_json::from_str::<JsonValue>(&content)
            .unwrap_or_else(|_| extract_intent_from_text(&content, candidate_intents.unwrap_or(&[])));

        Ok(normalize_result(parsed))
    }
}

/// Best-effort fallback when the model doesn't return valid JSON: look for
/// one of the candidate intent names appearing verbatim in the reply.
fn extract_intent_from_text(text: &str, candidate_intents: &[String]) -> JsonValue {
    let text_lower = text.to_lowercase();
    for intent in candidate_intents {
        if text_lower.contains(&intent.to_lowercase()) {
            return serde_json::json!({ "intent": intent, "confidence": 0.7 });
        }
    }
    serde_json::json!({ "intent": "unknown", "confidence": 0.5 })
}

fn normalize_result(result: JsonValue) -> IntentResult {
    let intent = result
        .get("intent")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let confidence = result
        .get("confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.5)
        .clamp(0.0, 1.0);

    let mut extras = std::collections::HashMap::new();
    if let Some(entities) = result.get("entities").filter(|v| !v.is_null()) {
        extras.insert("entities".to_string(), crate::ast::types::Value::String(entities.to_string()));
    }
    if let Some(raw) = result.get("raw_response").and_then(|v| v.as_str()) {
        extras.insert("raw_response".to_string(), crate::ast::types::Value::String(raw.to_string()));
    }

    IntentResult { intent, confidence, extras }
}
