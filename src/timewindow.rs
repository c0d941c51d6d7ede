// ⏰ Time Window Filter - reporting-period selection over tickets
//
// Three modes: one calendar month, one calendar year, or all history.
// Month/year membership is decided by the ticket's own wall-clock date
// (the timestamp interpreted in its recorded offset), never a
// UTC-normalized one — a ticket written at 23:30-03:00 on March 31
// belongs to March even though its UTC instant is April.

use chrono::{DateTime, Datelike, FixedOffset};

use crate::model::Ticket;

// ============================================================================
// TIME WINDOW
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// One calendar month. `month0` is 0-11.
    Month { month0: u32, year: i32 },

    /// One calendar year.
    Year { year: i32 },

    /// No filtering.
    All,
}

impl TimeWindow {
    /// Whether a ticket timestamp falls inside this window.
    pub fn contains(&self, date: &DateTime<FixedOffset>) -> bool {
        let local = date.naive_local();
        match *self {
            TimeWindow::Month { month0, year } => {
                local.month0() == month0 && local.year() == year
            }
            TimeWindow::Year { year } => local.year() == year,
            TimeWindow::All => true,
        }
    }
}

/// Select the tickets relevant to a reporting period. An empty result is
/// valid; downstream aggregators produce zero totals from it.
pub fn filter_tickets<'a>(tickets: &'a [Ticket], window: &TimeWindow) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| window.contains(&t.date)).collect()
}

// ============================================================================
// PERIOD HELPERS
// ============================================================================

/// Years that have data, newest first, always including the current year
/// (so selectors have somewhere to land on an empty store).
pub fn available_years(tickets: &[Ticket], current_year: i32) -> Vec<i32> {
    let mut years: Vec<i32> = tickets
        .iter()
        .map(|t| t.date.naive_local().year())
        .chain(std::iter::once(current_year))
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Display order for the purchase history: newest ticket first. The
/// record store delivers the collection unordered.
pub fn history_order(tickets: &[Ticket]) -> Vec<&Ticket> {
    let mut ordered: Vec<&Ticket> = tickets.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: &str, date: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            date: DateTime::parse_from_rfc3339(date).unwrap(),
            store: "Market".to_string(),
            items: vec![],
            total: 0.0,
        }
    }

    #[test]
    fn test_month_window_selects_exact_month_and_year() {
        let tickets = vec![
            ticket("a", "2024-03-01T10:00:00Z"),
            ticket("b", "2024-04-01T10:00:00Z"),
            ticket("c", "2023-03-15T10:00:00Z"),
        ];

        let window = TimeWindow::Month { month0: 2, year: 2024 };
        let filtered = filter_tickets(&tickets, &window);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn test_month_boundary_uses_wall_clock_date() {
        // 23:30 on March 31 at -03:00 is 02:30 April 1 in UTC.
        let t = ticket("edge", "2024-03-31T23:30:00-03:00");

        assert!(TimeWindow::Month { month0: 2, year: 2024 }.contains(&t.date));
        assert!(!TimeWindow::Month { month0: 3, year: 2024 }.contains(&t.date));
    }

    #[test]
    fn test_year_window_and_all() {
        let tickets = vec![
            ticket("a", "2024-01-01T00:00:00Z"),
            ticket("b", "2023-12-31T23:59:59Z"),
        ];

        let by_year = filter_tickets(&tickets, &TimeWindow::Year { year: 2024 });
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year[0].id, "a");

        assert_eq!(filter_tickets(&tickets, &TimeWindow::All).len(), 2);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let tickets = vec![ticket("a", "2024-03-01T10:00:00Z")];
        let filtered = filter_tickets(&tickets, &TimeWindow::Year { year: 1999 });
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_available_years_descending_with_current_seeded() {
        let tickets = vec![
            ticket("a", "2023-05-01T10:00:00Z"),
            ticket("b", "2021-05-01T10:00:00Z"),
            ticket("c", "2023-11-01T10:00:00Z"),
        ];

        assert_eq!(available_years(&tickets, 2026), vec![2026, 2023, 2021]);
        assert_eq!(available_years(&[], 2026), vec![2026]);
    }

    #[test]
    fn test_history_order_newest_first() {
        let tickets = vec![
            ticket("old", "2024-01-01T10:00:00Z"),
            ticket("new", "2024-06-01T10:00:00Z"),
            ticket("mid", "2024-03-01T10:00:00Z"),
        ];

        let ordered = history_order(&tickets);
        let ids: Vec<&str> = ordered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
