//! Intent classification
//!
//! The router only depends on [`IntentClassifier`]; [`KeywordClassifier`] is
//! the bundled implementation.

use tracing::debug;

use crate::task::intents;

/// Maps free-form text to an ordered, non-empty list of intent tags
pub trait IntentClassifier: Send + Sync {
    /// Classify `text`. Implementations fall back to a default tag rather
    /// than returning an empty list.
    fn classify(&self, text: &str) -> Vec<String>;
}

/// Keyword-matching classifier
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    fallback: String,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            fallback: intents::SUPPORT_REQUEST.to_string(),
        }
    }
}

impl KeywordClassifier {
    /// Create a classifier with the default fallback tag
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different fallback tag
    #[must_use]
    pub fn with_fallback(mut self, tag: impl Into<String>) -> Self {
        self.fallback = tag.into();
        self
    }
}

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        let mut tags = Vec::new();

        if mentions_any(&text, &["info", "details"]) {
            tags.push(intents::GET_CUSTOMER_INFO);
        }
        if text.contains("history") {
            tags.push(intents::GET_CUSTOMER_HISTORY);
        }
        if mentions_any(&text, &["update email", "update my email", "change email"]) {
            tags.push(intents::UPDATE_EMAIL);
        }
        if text.contains("refund") {
            tags.push(intents::REFUND_REQUEST);
        }
        if text.contains("cancel") {
            tags.push(intents::CANCEL_SUBSCRIPTION);
        }
        if text.contains("upgrad") {
            tags.push(intents::UPGRADE_REQUEST);
        }
        if text.contains("ticket") && mentions_any(&text, &["status", "check", "show"]) {
            tags.push(intents::SHOW_TICKET_STATUS);
        }
        if text.contains("ticket") && mentions_any(&text, &["open", "create", "raise"]) {
            tags.push(intents::ESCALATE_ISSUE);
        }
        if text.contains("active customers") {
            tags.push(intents::LIST_CUSTOMERS);
        }

        let mut tags: Vec<String> = tags.into_iter().map(str::to_string).collect();
        if tags.is_empty() {
            tags.push(self.fallback.clone());
        }

        debug!(text = %text, detected = ?tags, "Intent detection");
        tags
    }
}
