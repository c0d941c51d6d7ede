// 🧾 Data Model - Tickets, line items, and the product dictionary
//
// A Ticket is one normalized receipt: store, ingestion timestamp, ordered
// line items, and a total computed once at ingestion. The Dictionary maps
// raw extracted product names to a display alias and a category label
// from a fixed closed set.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// CATEGORY SET
// ============================================================================

/// Catch-all category for unknown products and unrecognized labels.
pub const OTHER_CATEGORY: &str = "Other";

/// Closed set of category labels shared by the normalizer defaults, the
/// aggregators, and the extraction prompt hint. Labels outside this set are
/// accepted on write but collapse to `OTHER_CATEGORY` wherever grouping
/// happens.
pub const CATEGORIES: [&str; 15] = [
    "Dairy",
    "Bakery",
    "Produce",
    "Meat",
    "Cleaning & Household",
    "Hygiene",
    "Beverages",
    "Frozen & Prepared",
    "Pantry & Dry Goods",
    "Snacks",
    "Spices & Condiments",
    "Pets",
    "Desserts",
    "Sweets",
    OTHER_CATEGORY,
];

/// Month display names, index 0-11.
pub const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Store label used when extraction omits the store name.
pub const DEFAULT_STORE: &str = "Supermarket";

/// Tolerance for floating-point money comparisons.
pub const AMOUNT_TOLERANCE: f64 = 1e-6;

/// Map an arbitrary label onto the closed category set.
///
/// Matching is case-insensitive (same policy as looking up categories by
/// name elsewhere); anything that does not match collapses to
/// `OTHER_CATEGORY` at read time. Write paths never reject a label.
pub fn canonical_category(label: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(label.trim()))
        .copied()
        .unwrap_or(OTHER_CATEGORY)
}

// ============================================================================
// LINE ITEM
// ============================================================================

/// One product line within a ticket.
///
/// `name` is the raw extracted product name and doubles as the dictionary
/// key. `price` is the unit price; the line total is always derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    pub price: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: f64, price: f64) -> Self {
        LineItem {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Derived `quantity × unit price`.
    pub fn line_total(&self) -> f64 {
        self.quantity * self.price
    }
}

// ============================================================================
// TICKET
// ============================================================================

/// One normalized receipt record.
///
/// `id` is assigned by the record store on creation (empty = not yet
/// stored; the serde default mirrors how exported snapshots may carry
/// tickets without ids). `date` is the ingestion timestamp, not the
/// receipt's printed date. `total` is computed once at ingestion and
/// persisted; it is never recomputed from `items` on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub date: DateTime<FixedOffset>,

    pub store: String,

    pub items: Vec<LineItem>,

    pub total: f64,
}

impl Ticket {
    /// Whether the store has assigned this ticket an identity yet.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Sum of line totals, as recomputed from the items.
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Construction law: `total == Σ line totals` within tolerance.
    pub fn total_is_consistent(&self) -> bool {
        (self.total - self.items_total()).abs() < AMOUNT_TOLERANCE
    }
}

// ============================================================================
// DICTIONARY
// ============================================================================

/// One dictionary value, keyed externally by the raw product name.
///
/// `alias` is the user-facing display name; `category` should be one of
/// `CATEGORIES` but unrecognized values are tolerated (they read as
/// `OTHER_CATEGORY`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub alias: String,
    pub category: String,
}

impl DictionaryEntry {
    pub fn new(alias: impl Into<String>, category: impl Into<String>) -> Self {
        DictionaryEntry {
            alias: alias.into(),
            category: category.into(),
        }
    }
}

/// Raw product name → entry. A BTreeMap keeps snapshots and merge patches
/// deterministically ordered.
pub type Dictionary = BTreeMap<String, DictionaryEntry>;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_date(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_line_total_is_derived() {
        let item = LineItem::new("leche entera", 2.0, 1.5);
        assert!((item.line_total() - 3.0).abs() < AMOUNT_TOLERANCE);
    }

    #[test]
    fn test_ticket_total_consistency() {
        let ticket = Ticket {
            id: "t1".to_string(),
            date: fixed_date("2024-03-01T10:00:00+01:00"),
            store: "Market".to_string(),
            items: vec![
                LineItem::new("leche", 2.0, 1.5),
                LineItem::new("pan", 1.0, 0.8),
            ],
            total: 3.8,
        };

        assert!(ticket.total_is_consistent());

        let mut desynced = ticket.clone();
        desynced.total = 5.0;
        assert!(!desynced.total_is_consistent());
    }

    #[test]
    fn test_empty_items_is_valid() {
        let ticket = Ticket {
            id: String::new(),
            date: fixed_date("2024-03-01T10:00:00Z"),
            store: DEFAULT_STORE.to_string(),
            items: vec![],
            total: 0.0,
        };

        assert!(!ticket.has_id());
        assert!(ticket.total_is_consistent());
    }

    #[test]
    fn test_canonical_category() {
        assert_eq!(canonical_category("Dairy"), "Dairy");
        assert_eq!(canonical_category("dairy"), "Dairy");
        assert_eq!(canonical_category(" Snacks "), "Snacks");
        assert_eq!(canonical_category("Lácteos"), OTHER_CATEGORY);
        assert_eq!(canonical_category(""), OTHER_CATEGORY);
        assert_eq!(canonical_category("other"), OTHER_CATEGORY);
    }

    #[test]
    fn test_ticket_serde_omits_empty_id() {
        let ticket = Ticket {
            id: String::new(),
            date: fixed_date("2024-03-01T10:00:00Z"),
            store: "Market".to_string(),
            items: vec![LineItem::new("leche", 1.0, 1.5)],
            total: 1.5,
        };

        let json = serde_json::to_value(&ticket).unwrap();
        assert!(json.get("id").is_none());

        // Tickets without an id still parse back (id defaults to empty).
        let back: Ticket = serde_json::from_value(json).unwrap();
        assert!(!back.has_id());
        assert_eq!(back.items.len(), 1);
    }

    #[test]
    fn test_ticket_serde_roundtrip_preserves_offset_wall_clock() {
        let ticket = Ticket {
            id: "abc".to_string(),
            date: fixed_date("2024-12-31T23:30:00-03:00"),
            store: "Market".to_string(),
            items: vec![],
            total: 0.0,
        };

        let json = serde_json::to_string(&ticket).unwrap();
        let back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(back.date.naive_local(), ticket.date.naive_local());
    }

    #[test]
    fn test_category_set_contains_catch_all() {
        assert!(CATEGORIES.contains(&OTHER_CATEGORY));
        assert_eq!(MONTHS.len(), 12);
    }
}
