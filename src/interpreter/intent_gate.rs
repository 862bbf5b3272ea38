//! Heuristic gating whether a piece of `listen`ed input should be sent to
//! the intent classifier at all. Most data fields (order numbers, typed-in
//! IDs) are never natural-language and classifying them would just waste a
//! round trip.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Variable names that name a structured data field rather than free text.
    static ref DATA_FIELDS: HashSet<&'static str> = [
        "order_id",
        "complaint_id",
        "complaint_content",
        "suggestion_content",
        "contact_info",
        "refund_reason",
        "refund_reason_code",
        "refund_reason_detail",
        "logistics_number",
        "confirm",
    ]
    .into_iter()
    .collect();
}

/// Decides whether `user_input`, just stored into `variable_name`, should be
/// passed to the classifier.
pub fn should_recognize_intent(variable_name: &str, user_input: &str) -> bool {
    let name_lower = variable_name.to_lowercase();

    if name_lower.contains("input") || name_lower.contains("intent") {
        return true;
    }

    let trimmed = user_input.trim();
    let is_all_digits = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit());

    if DATA_FIELDS.contains(name_lower.as_str()) {
        if is_all_digits {
            return false;
        }
        // Free-text refund reasons (e.g. "quality issue") are still worth classifying.
        if name_lower.starts_with("refund_reason") {
            return true;
        }
        return false;
    }

    if is_all_digits && trimmed.len() <= 3 {
        // A single digit 1-9 reads as a menu choice, worth classifying;
        // longer short numbers look like fragments of an ID instead.
        return trimmed.len() == 1 && ('1'..='9').contains(&trimmed.chars().next().unwrap());
    }

    name_lower.contains("user") || name_lower.contains("input")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_named_user_input_is_always_classified() {
        assert!(should_recognize_intent("user_input", "123"));
        assert!(should_recognize_intent("some_intent", "anything"));
    }

    #[test]
    fn numeric_data_fields_skip_classification() {
        assert!(!should_recognize_intent("order_id", "12345"));
        assert!(!should_recognize_intent("logistics_number", "98765"));
    }

    #[test]
    fn refund_reason_text_is_classified_even_as_a_data_field() {
        assert!(should_recognize_intent("refund_reason", "quality issue"));
        assert!(!should_recognize_intent("refund_reason", "42"));
    }

    #[test]
    fn single_digit_menu_choice_is_classified() {
        assert!(should_recognize_intent("selection", "5"));
        assert!(!should_recognize_intent("selection", "0"));
    }

    #[test]
    fn short_numeric_non_menu_input_is_not_classified() {
        assert!(!should_recognize_intent("selection", "12"));
        assert!(!should_recognize_intent("selection", "123"));
    }

    #[test]
    fn longer_numeric_fragments_fall_through_to_default() {
        // > 3 digits: not caught by the menu-digit rule, falls to the
        // name-based default, which for a plain variable name is false.
        assert!(!should_recognize_intent("reference_code", "12345"));
    }

    #[test]
    fn plain_variable_defaults_to_not_classified() {
        assert!(!should_recognize_intent("confirm", "yes"));
    }
}
