//! 🎯 Category selection: "show me the tickets behind that number"
//!
//! Someone clicked the "Open Tickets" card. Or a client name in a chart. Either way
//! they want the tickets from the CURRENT filtered view that belong to that
//! `(category, value)` pair. This module answers that, and only that. Writing the
//! result into shared state is the dashboard's job, not ours.
//!
//! Matching here is looser than the Filter Engine's:
//! - everything is case-insensitive
//! - for `status`, "open" means "not resolved and not closed". Exclusion, not
//!   inclusion. "InProgress", "Waiting on customer" and "Unknown" all count as open.
//!
//! The metrics aggregator uses [`StatusClass`] too, so clicking a metric card always
//! selects exactly the tickets that card counted. 🦆

use serde::Serialize;

use crate::common::{CanonicalTicket, TicketField};

/// 🏷️ Synthetic status classes used by selection and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusClass {
    Open,
    Closed,
    Resolved,
}

impl StatusClass {
    /// 🔬 Classify a raw status. Anything not closed or resolved is open.
    pub fn of(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "closed" => StatusClass::Closed,
            "resolved" => StatusClass::Resolved,
            _ => StatusClass::Open,
        }
    }
}

/// 📌 A drill-down result tagged with the click that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub category: String,
    pub value: String,
    pub tickets: Vec<CanonicalTicket>,
}

/// 🎯 Select tickets from `filtered_view` by `(category, value)`. Pure, stable.
pub fn select_by_category(
    filtered_view: &[CanonicalTicket],
    category: &str,
    value: &str,
) -> Vec<CanonicalTicket> {
    filtered_view
        .iter()
        .filter(|ticket| matches_category(ticket, category, value))
        .cloned()
        .collect()
}

/// ✅ Does one ticket belong to `(category, value)`?
pub fn matches_category(ticket: &CanonicalTicket, category: &str, value: &str) -> bool {
    let wanted = value.to_lowercase();
    if TicketField::from_name(category) == Some(TicketField::Status) {
        return matches_status_class(&ticket.status, &wanted);
    }
    // -- 🕳️ a field the ticket doesn't have can't match anything
    ticket
        .lookup(category)
        .is_some_and(|actual| actual.to_lowercase() == wanted)
}

/// Precedence: open, closed, resolved, then literal. `wanted` is already lowercased.
fn matches_status_class(status: &str, wanted: &str) -> bool {
    match wanted {
        "open" => StatusClass::of(status) == StatusClass::Open,
        "closed" => StatusClass::of(status) == StatusClass::Closed,
        "resolved" => StatusClass::of(status) == StatusClass::Resolved,
        literal => status.to_lowercase() == literal,
    }
}
