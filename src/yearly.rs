// 📅 Yearly Matrix Builder - category × month spending for one year
//
// Builds the annual review table: for every category a fixed 12-slot
// array of monthly totals (index = month 0-11), plus the same matrix
// broken down per alias. Absent months are 0.0 — a month with zero spend
// and a month never touched are observably identical, and row/grand
// totals are always derived sums, never stored separately.

use serde::Serialize;
use std::collections::HashMap;

use crate::dictionary::{resolve_alias, resolve_category};
use crate::model::{Dictionary, Ticket};
use crate::timewindow::TimeWindow;
use chrono::Datelike;

// ============================================================================
// MATRIX TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct YearlyAliasRow {
    pub alias: String,
    pub monthly: [f64; 12],
}

impl YearlyAliasRow {
    pub fn total(&self) -> f64 {
        self.monthly.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YearlyRow {
    pub category: String,
    pub monthly: [f64; 12],
    /// Per-alias detail rows for this category, descending by year total.
    pub details: Vec<YearlyAliasRow>,
}

impl YearlyRow {
    /// Full-year total for this category (derived).
    pub fn total(&self) -> f64 {
        self.monthly.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YearlyAnalysis {
    pub year: i32,
    /// Category rows, descending by full-year total.
    pub rows: Vec<YearlyRow>,
}

impl YearlyAnalysis {
    /// Grand total across every category (derived).
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().map(YearlyRow::total).sum()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Build the yearly matrix from the full ticket history. Year membership
/// and the month slot both come from the ticket's wall-clock date, the
/// same rule the time window filter uses.
pub fn yearly_analysis(tickets: &[Ticket], dictionary: &Dictionary, year: i32) -> YearlyAnalysis {
    let window = TimeWindow::Year { year };
    let mut rows: Vec<YearlyRow> = Vec::new();
    let mut by_category: HashMap<&'static str, usize> = HashMap::new();

    for ticket in tickets {
        if !window.contains(&ticket.date) {
            continue;
        }
        let month = ticket.date.naive_local().month0() as usize;

        for item in &ticket.items {
            let category = resolve_category(&item.name, dictionary);
            let alias = resolve_alias(&item.name, dictionary);
            let line_total = item.line_total();

            let idx = *by_category.entry(category).or_insert_with(|| {
                rows.push(YearlyRow {
                    category: category.to_string(),
                    monthly: [0.0; 12],
                    details: Vec::new(),
                });
                rows.len() - 1
            });

            let row = &mut rows[idx];
            row.monthly[month] += line_total;
            match row.details.iter_mut().find(|d| d.alias == alias) {
                Some(detail) => detail.monthly[month] += line_total,
                None => {
                    let mut monthly = [0.0; 12];
                    monthly[month] = line_total;
                    row.details.push(YearlyAliasRow {
                        alias: alias.to_string(),
                        monthly,
                    });
                }
            }
        }
    }

    for row in &mut rows {
        row.details.sort_by(|a, b| b.total().total_cmp(&a.total()));
    }
    rows.sort_by(|a, b| b.total().total_cmp(&a.total()));

    YearlyAnalysis { year, rows }
}

// ============================================================================
// TESTS
// ============================================================================
