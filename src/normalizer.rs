// 🛠️ Ticket Normalizer - extraction response → canonical Ticket
//
// Turns a best-effort extraction response into a durable Ticket plus the
// set of dictionary entries to stage for names seen for the first time.
// Bad numeric fields degrade a single line to defaults instead of failing
// the whole ticket; dictionary staging is strictly additive — an existing
// entry is never touched by this path.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::extraction::ExtractedTicket;
use crate::model::{Dictionary, DictionaryEntry, LineItem, Ticket, DEFAULT_STORE, OTHER_CATEGORY};

// ============================================================================
// OUTPUT
// ============================================================================

/// Result of normalizing one scan: a candidate ticket (no id yet — the
/// record store assigns one on create) and the staged new dictionary
/// entries. Writing either to the stores is the caller's separate step.
#[derive(Debug, Clone)]
pub struct NormalizedScan {
    pub ticket: Ticket,
    pub new_entries: Dictionary,
}

impl NormalizedScan {
    pub fn has_new_entries(&self) -> bool {
        !self.new_entries.is_empty()
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalize an extraction response against the dictionary snapshot held
/// at ingestion time.
///
/// `scanned_at` becomes the ticket's date (ingestion time, not the
/// receipt's printed date). The snapshot may be stale relative to a
/// concurrent scan; per-key merge semantics at the store make duplicate
/// staging convergent.
pub fn normalize(
    extracted: &ExtractedTicket,
    dictionary: &Dictionary,
    scanned_at: DateTime<FixedOffset>,
) -> NormalizedScan {
    let mut items = Vec::with_capacity(extracted.items.len());
    let mut new_entries = Dictionary::new();

    for raw in &extracted.items {
        let name = raw.original_name.trim();
        // A line without a name has no dictionary key and no identity.
        if name.is_empty() {
            continue;
        }

        let quantity = coerce_non_negative(&raw.quantity, 1.0);
        let price = coerce_non_negative(&raw.unit_price, 0.0);
        items.push(LineItem::new(name, quantity, price));

        if !dictionary.contains_key(name) && !new_entries.contains_key(name) {
            let alias = raw
                .suggested_alias
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .unwrap_or(name);
            let category = raw
                .suggested_category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(OTHER_CATEGORY);
            new_entries.insert(name.to_string(), DictionaryEntry::new(alias, category));
        }
    }

    let total = items.iter().map(LineItem::line_total).sum();
    let store = extracted
        .store
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STORE)
        .to_string();

    NormalizedScan {
        ticket: Ticket {
            id: String::new(),
            date: scanned_at,
            store,
            items,
            total,
        },
        new_entries,
    }
}

/// Coerce a raw JSON field to a non-negative real.
///
/// Accepts numbers and numeric strings. Missing, non-numeric, non-finite,
/// and negative values all fall back to the default.
fn coerce_non_negative(value: &Value, default: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => default,
    }
}

// ============================================================================
// TESTS
// ============================================================================
