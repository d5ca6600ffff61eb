//! 📊 Metrics: three numbers on three cards. Total, open, resolved.
//!
//! Open and resolved use [`StatusClass`], the same classification the category
//! selector uses, so the number on a card always equals the number of tickets
//! you get when you click it.

use serde::Serialize;

use crate::common::CanonicalTicket;
use crate::selection::StatusClass;

/// 🔢 Summary counts over a filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub open: usize,
    pub resolved: usize,
}

/// 📋 What the summary cards and the filter badge read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub metrics: Metrics,
    /// Selectors currently set to something other than "All".
    pub active_filters: usize,
}

/// 🧮 Count the view.
pub fn aggregate(filtered_view: &[CanonicalTicket]) -> Metrics {
    filtered_view.iter().fold(
        Metrics {
            total: filtered_view.len(),
            ..Metrics::default()
        },
        |mut metrics, ticket| {
            match StatusClass::of(&ticket.status) {
                StatusClass::Open => metrics.open += 1,
                StatusClass::Resolved => metrics.resolved += 1,
                StatusClass::Closed => {}
            }
            metrics
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::selection::select_by_category;
    use serde_json::{Value, json};

    fn tickets(rows: Value) -> Vec<CanonicalTicket> {
        let rows = rows
            .as_array()
            .expect("💀 fixture is an array")
            .iter()
            .filter_map(|row| row.as_object().cloned())
            .collect();
        normalize(rows)
    }

    #[test]
    fn the_one_where_in_progress_counts_as_open() {
        let the_view = tickets(json!([
            {"Status": "Open"},
            {"Status": "Closed"},
            {"Status": "InProgress"}
        ]));
        assert_eq!(
            aggregate(&the_view),
            Metrics {
                total: 3,
                open: 2,
                resolved: 0
            }
        );
    }

    #[test]
    fn the_one_where_the_card_and_the_click_agree() {
        let views = [
            tickets(json!([])),
            tickets(json!([{"Status": "resolved"}, {"Status": "CLOSED"}, {}])),
            tickets(json!([
                {"Status": "Open"}, {"Status": "Pending"}, {"Status": "Resolved"},
                {"Status": "closed"}, {"Status": "open"}, {"Client": "no status at all"}
            ])),
        ];
        for the_view in views {
            let metrics = aggregate(&the_view);
            assert_eq!(metrics.open, select_by_category(&the_view, "status", "Open").len());
            assert_eq!(metrics.resolved, select_by_category(&the_view, "status", "Resolved").len());
            assert_eq!(metrics.total, the_view.len());
        }
    }

    #[test]
    fn the_one_where_nothing_counts_as_nothing() {
        assert_eq!(aggregate(&[]), Metrics::default());
    }
}
