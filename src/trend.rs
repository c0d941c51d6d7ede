// 📈 Price Trend Builder - unit-price history for one alias
//
// Scans the whole ticket history for line items whose resolved alias
// matches the target, then merges purchases made on the same calendar day
// into one point: the plotted price is the arithmetic mean of that day's
// unit prices, and every individual purchase (store, raw name, price) is
// retained for inspection. A day is the wall-clock date of the ticket's
// recorded offset.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::dictionary::resolve_alias;
use crate::model::{Dictionary, Ticket};

// ============================================================================
// TREND TYPES
// ============================================================================

/// One individual purchase behind a trend point.
#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub store: String,
    pub original_name: String,
    pub unit_price: f64,
}

/// One day's (possibly averaged) price observation.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    /// Mean unit price across the day's purchases.
    pub price: f64,
    pub purchases: Vec<Purchase>,
}

impl TrendPoint {
    /// Multiplicity marker: a day with two or more purchases is rendered
    /// differently from a single-purchase day.
    pub fn is_multiple(&self) -> bool {
        self.purchases.len() > 1
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Build the time-ordered price series for one resolved alias. An alias
/// with no history yields an empty, valid series.
pub fn price_trend(tickets: &[Ticket], dictionary: &Dictionary, alias: &str) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Purchase>> = BTreeMap::new();

    for ticket in tickets {
        for item in &ticket.items {
            if resolve_alias(&item.name, dictionary) != alias {
                continue;
            }
            let day = ticket.date.naive_local().date();
            by_day.entry(day).or_default().push(Purchase {
                store: ticket.store.clone(),
                original_name: item.name.clone(),
                unit_price: item.price,
            });
        }
    }

    // BTreeMap iteration gives ascending days for free.
    by_day
        .into_iter()
        .map(|(day, purchases)| {
            let price =
                purchases.iter().map(|p| p.unit_price).sum::<f64>() / purchases.len() as f64;
            TrendPoint { day, price, purchases }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DictionaryEntry, LineItem, AMOUNT_TOLERANCE};
    use chrono::DateTime;

    fn ticket(date: &str, store: &str, items: Vec<LineItem>) -> Ticket {
        let total = items.iter().map(LineItem::line_total).sum();
        Ticket {
            id: "t".to_string(),
            date: DateTime::parse_from_rfc3339(date).unwrap(),
            store: store.to_string(),
            items,
            total,
        }
    }

    fn milk_dictionary() -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert(
            "LECHE ENT 1L".to_string(),
            DictionaryEntry::new("Milk", "Dairy"),
        );
        dict.insert(
            "LECHE DESN 1L".to_string(),
            DictionaryEntry::new("Milk", "Dairy"),
        );
        dict
    }

    #[test]
    fn test_same_day_purchases_merge_to_mean() {
        let dict = milk_dictionary();
        let tickets = vec![
            ticket(
                "2024-03-01T09:00:00Z",
                "Market A",
                vec![LineItem::new("LECHE ENT 1L", 1.0, 2.0)],
            ),
            ticket(
                "2024-03-01T18:00:00Z",
                "Market B",
                vec![LineItem::new("LECHE DESN 1L", 1.0, 3.0)],
            ),
            ticket(
                "2024-03-08T09:00:00Z",
                "Market A",
                vec![LineItem::new("LECHE ENT 1L", 1.0, 2.2)],
            ),
        ];

        let points = price_trend(&tickets, &dict, "Milk");
        assert_eq!(points.len(), 2);

        // Merged day: mean of 2.00 and 3.00, both purchases retained.
        assert!((points[0].price - 2.5).abs() < AMOUNT_TOLERANCE);
        assert!(points[0].is_multiple());
        assert_eq!(points[0].purchases.len(), 2);
        assert_eq!(points[0].purchases[0].store, "Market A");
        assert_eq!(points[0].purchases[1].original_name, "LECHE DESN 1L");

        // Unmerged day keeps its single price.
        assert!((points[1].price - 2.2).abs() < AMOUNT_TOLERANCE);
        assert!(!points[1].is_multiple());
    }

    #[test]
    fn test_points_sorted_ascending_by_day() {
        let dict = milk_dictionary();
        let tickets = vec![
            ticket("2024-05-01T09:00:00Z", "A", vec![LineItem::new("LECHE ENT 1L", 1.0, 2.4)]),
            ticket("2024-01-01T09:00:00Z", "A", vec![LineItem::new("LECHE ENT 1L", 1.0, 2.0)]),
            ticket("2024-03-01T09:00:00Z", "A", vec![LineItem::new("LECHE ENT 1L", 1.0, 2.2)]),
        ];

        let points = price_trend(&tickets, &dict, "Milk");
        let days: Vec<NaiveDate> = points.iter().map(|p| p.day).collect();
        let mut sorted = days.clone();
        sorted.sort();
        assert_eq!(days, sorted);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_plotted_price_ignores_quantity() {
        // Mean of unit prices, not a quantity-weighted average.
        let dict = milk_dictionary();
        let tickets = vec![
            ticket("2024-03-01T09:00:00Z", "A", vec![LineItem::new("LECHE ENT 1L", 10.0, 2.0)]),
            ticket("2024-03-01T10:00:00Z", "A", vec![LineItem::new("LECHE ENT 1L", 1.0, 4.0)]),
        ];

        let points = price_trend(&tickets, &dict, "Milk");
        assert!((points[0].price - 3.0).abs() < AMOUNT_TOLERANCE);
    }

    #[test]
    fn test_day_grouping_follows_wall_clock() {
        let dict = milk_dictionary();
        // Same UTC instant range, but the wall-clock dates differ by offset.
        let tickets = vec![
            ticket(
                "2024-03-01T23:30:00-03:00",
                "A",
                vec![LineItem::new("LECHE ENT 1L", 1.0, 2.0)],
            ),
            ticket(
                "2024-03-02T01:00:00-03:00",
                "A",
                vec![LineItem::new("LECHE ENT 1L", 1.0, 3.0)],
            ),
        ];

        let points = price_trend(&tickets, &dict, "Milk");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].day, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(points[1].day, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn test_alias_without_history_yields_empty_series() {
        let dict = milk_dictionary();
        let tickets = vec![ticket(
            "2024-03-01T09:00:00Z",
            "A",
            vec![LineItem::new("pan", 1.0, 0.8)],
        )];

        assert!(price_trend(&tickets, &dict, "Milk").is_empty());
        assert!(price_trend(&[], &dict, "Milk").is_empty());
    }
}
