//! Keyword-based classifier used for tests and offline operation.

use async_trait::async_trait;
use lazy_static::lazy_static;

use crate::classifier::types::{ClassifierError, IntentClassifier, IntentResult};

lazy_static! {
    /// Intents are checked in this order; the first one whose keyword list
    /// contains a hit wins, so more specific intents are listed first.
    static ref INTENT_PRIORITY: Vec<(&'static str, &'static [&'static str])> = vec![
        ("物流查询", &["物流", "快递", "配送", "运输"]),
        ("退款申请", &["退款", "退货", "申请退款"]),
        ("订单查询", &["订单", "查询", "订单号", "订单状态"]),
        ("产品咨询", &["产品", "商品", "咨询", "介绍"]),
        ("投诉建议", &["投诉", "建议", "意见", "不满"]),
    ];
}

/// Matches user input against a fixed Chinese-language keyword table.
/// Never fails and never calls out over the network.
pub struct MockClassifier;

impl MockClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(&self, user_input: &str, _candidate_intents: Option<&[String]>) -> Result<IntentResult, ClassifierError> {
        let input_lower = user_input.to_lowercase();

        for (intent, keywords) in INTENT_PRIORITY.iter() {
            if keywords.iter().any(|k| input_lower.contains(k)) {
                return Ok(IntentResult {
                    intent: intent.to_string(),
                    confidence: 0.8,
                    extras: Default::default(),
                });
            }
        }

        Ok(IntentResult::unknown())
    }
}
