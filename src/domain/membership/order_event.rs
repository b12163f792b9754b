//! Storefront order payloads and line-item classification.
//!
//! Order webhooks arrive as opaque line items; classification decides
//! whether an item represents a new membership purchase, a renewal, or an
//! unrelated product. The classifier is a trait so the keyword heuristic
//! can be swapped for a catalogue lookup without touching the handlers.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::Timestamp;

/// Financial status of an order as reported by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    Paid,
    Refunded,
    Cancelled,
}

/// One purchased line item within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub quantity: u32,
    pub price: f64,
}

/// An order event received from the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Storefront order identifier; also the idempotency key.
    pub order_id: String,
    pub customer_id: String,
    pub line_items: Vec<LineItem>,
    pub financial_status: FinancialStatus,
    pub occurred_at: Timestamp,
}

/// What a line item means for the membership lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemKind {
    NewMembership,
    Renewal,
    Unrelated,
}

/// Decides what a line item means for the membership lifecycle.
pub trait LineItemClassifier: Send + Sync {
    fn classify(&self, item: &LineItem) -> LineItemKind;
}

static MEMBERSHIP_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "membership",
        "annual-membership",
        "premium-membership",
        "renewal",
    ])
});

static RENEWAL_KEYWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["renewal", "renew"]));

/// Keyword-based classifier matching on title and SKU substrings.
///
/// Matching is case-insensitive. Renewal keywords are checked first so
/// "Membership Renewal" classifies as a renewal, not a new purchase.
#[derive(Debug, Default, Clone)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn haystack(item: &LineItem) -> String {
        let mut text = item.title.to_ascii_lowercase();
        if let Some(sku) = &item.sku {
            text.push(' ');
            text.push_str(&sku.to_ascii_lowercase());
        }
        text
    }
}

impl LineItemClassifier for KeywordClassifier {
    fn classify(&self, item: &LineItem) -> LineItemKind {
        let text = Self::haystack(item);

        if RENEWAL_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            return LineItemKind::Renewal;
        }
        if MEMBERSHIP_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            return LineItemKind::NewMembership;
        }
        LineItemKind::Unrelated
    }
}

impl OrderEvent {
    /// The most lifecycle-significant classification across line items.
    ///
    /// Renewal wins over a new purchase, which wins over unrelated; an
    /// order mixing a renewal with unrelated products is still a renewal.
    pub fn classify(&self, classifier: &dyn LineItemClassifier) -> LineItemKind {
        let mut best = LineItemKind::Unrelated;
        for item in &self.line_items {
            match classifier.classify(item) {
                LineItemKind::Renewal => return LineItemKind::Renewal,
                LineItemKind::NewMembership => best = LineItemKind::NewMembership,
                LineItemKind::Unrelated => {}
            }
        }
        best
    }
}
