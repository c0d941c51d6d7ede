// 📊 Category Aggregator - category → alias → total over a ticket set
//
// Pure accumulation over an already time-filtered ticket set. Every line
// item resolves through the dictionary, then its line total accumulates
// into a per-category rollup and a per-alias breakdown inside it.
// Ordering is descending by total, ties broken by first appearance in the
// scan — deterministic for a given snapshot.

use serde::Serialize;
use std::collections::HashMap;

use crate::dictionary::{resolve_alias, resolve_category};
use crate::model::{Dictionary, Ticket};

/// Default number of alias rows the presentation layer shows per category.
pub const DEFAULT_TOP_ITEMS: usize = 5;

// ============================================================================
// BREAKDOWN TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AliasTotal {
    pub alias: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: f64,
    /// Full alias breakdown, descending by total. Truncation is a
    /// read-only view via `top_items`; the aggregate always keeps
    /// everything.
    pub items: Vec<AliasTotal>,
}

impl CategoryBreakdown {
    /// Top-N alias rows by total. `top_items(DEFAULT_TOP_ITEMS)` is what
    /// the category cards show.
    pub fn top_items(&self, n: usize) -> &[AliasTotal] {
        &self.items[..n.min(self.items.len())]
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Aggregate a filtered ticket set into per-category breakdowns, sorted
/// descending by category total.
pub fn aggregate_by_category(
    tickets: &[&Ticket],
    dictionary: &Dictionary,
) -> Vec<CategoryBreakdown> {
    let mut breakdowns: Vec<CategoryBreakdown> = Vec::new();
    let mut by_category: HashMap<&'static str, usize> = HashMap::new();

    for ticket in tickets {
        for item in &ticket.items {
            let category = resolve_category(&item.name, dictionary);
            let alias = resolve_alias(&item.name, dictionary);
            let line_total = item.line_total();

            let idx = *by_category.entry(category).or_insert_with(|| {
                breakdowns.push(CategoryBreakdown {
                    category: category.to_string(),
                    total: 0.0,
                    items: Vec::new(),
                });
                breakdowns.len() - 1
            });

            let breakdown = &mut breakdowns[idx];
            breakdown.total += line_total;
            match breakdown.items.iter_mut().find(|a| a.alias == alias) {
                Some(existing) => existing.total += line_total,
                None => breakdown.items.push(AliasTotal {
                    alias: alias.to_string(),
                    total: line_total,
                }),
            }
        }
    }

    // Stable sorts: ties keep first-appearance order.
    for breakdown in &mut breakdowns {
        breakdown.items.sort_by(|a, b| b.total.total_cmp(&a.total));
    }
    breakdowns.sort_by(|a, b| b.total.total_cmp(&a.total));

    breakdowns
}

/// Grand total of a breakdown set (the "spend in selection" headline).
pub fn selection_total(breakdowns: &[CategoryBreakdown]) -> f64 {
    breakdowns.iter().map(|b| b.total).sum()
}

/// All-time spend across every ticket — the dashboard headline. Uses the
/// persisted ticket totals, not a recomputation from items.
pub fn total_spent(tickets: &[Ticket]) -> f64 {
    tickets.iter().map(|t| t.total).sum()
}

// ============================================================================
// TESTS
// ============================================================================
