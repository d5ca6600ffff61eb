//! 🚦 The Filter Engine: date window + six dropdowns, every ticket must pass all of them.
//!
//! 🎬 *[a ticket approaches the velvet rope]*
//! *["Date?" asks the bouncer. The ticket shows a date inside the window.]*
//! *["Client?" "Acme." The list says All. The ticket walks in.]*
//! *["Status?" "Open." The list says Open. The open-status set nods. In.]*
//!
//! Everything here is pure. Same tickets + same [`FilterState`] = same output, in
//! the same order, every time. No caches, no hidden state.
//!
//! ## Status selectors 🏷️
//!
//! The status dropdown knows two synthetic classes:
//! - "Open" matches any status in [`OPEN_STATUSES`]
//! - "Closed" matches any status in [`CLOSED_STATUSES`]
//!
//! Anything else is exact match. Note this is an INCLUSION rule. The category
//! selector (see `selection`) defines "open" by EXCLUSION instead. Those are two
//! different rules at two different stages and they stay that way.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ALL, CanonicalTicket, TicketField};

/// 📆 Default lookback for the date window.
pub const DEFAULT_WINDOW_MONTHS: u32 = 3;

/// ✅ Status strings the "Open" selector accepts.
pub const OPEN_STATUSES: &[&str] = &["Open"];

/// 🔒 Status strings the "Closed" selector accepts.
pub const CLOSED_STATUSES: &[&str] = &["Closed"];

/// 📅 What to do with tickets whose date did not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndatedPolicy {
    /// Undated tickets never fall inside a date range.
    #[default]
    Exclude,
    /// Undated tickets skip the date check and only face the dropdowns.
    Include,
}

/// 🎛️ The active filter configuration.
///
/// Both date bounds are inclusive. `start_date <= end_date` is the caller's
/// problem; an inverted window simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub ticket_number: String,
    pub technology: String,
    pub client: String,
    pub ticket_type: String,
    pub assigned_to: String,
    pub status: String,
}

impl FilterState {
    /// 🪟 `window_months` back from `now`, every selector on "All".
    pub fn default_window(now: DateTime<Utc>, window_months: u32) -> Self {
        let start_date = now
            .checked_sub_months(Months::new(window_months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            start_date,
            end_date: now,
            ticket_number: ALL.to_string(),
            technology: ALL.to_string(),
            client: ALL.to_string(),
            ticket_type: ALL.to_string(),
            assigned_to: ALL.to_string(),
            status: ALL.to_string(),
        }
    }

    /// The selector value for one field.
    pub fn selector(&self, field: TicketField) -> &str {
        match field {
            TicketField::TicketNumber => &self.ticket_number,
            TicketField::Technology => &self.technology,
            TicketField::Client => &self.client,
            TicketField::TicketType => &self.ticket_type,
            TicketField::AssignedTo => &self.assigned_to,
            TicketField::Status => &self.status,
        }
    }

    fn selector_mut(&mut self, field: TicketField) -> &mut String {
        match field {
            TicketField::TicketNumber => &mut self.ticket_number,
            TicketField::Technology => &mut self.technology,
            TicketField::Client => &mut self.client,
            TicketField::TicketType => &mut self.ticket_type,
            TicketField::AssignedTo => &mut self.assigned_to,
            TicketField::Status => &mut self.status,
        }
    }

    /// 🔢 How many selectors are doing something (i.e. are not "All").
    pub fn active_filter_count(&self) -> usize {
        TicketField::ALL_FIELDS
            .into_iter()
            .filter(|field| self.selector(*field) != ALL)
            .count()
    }

    /// 🧩 Overlay a patch. Fields the patch leaves as `None` keep their value.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        for (field, value) in patch.selectors {
            *self.selector_mut(field) = value;
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::default_window(Utc::now(), DEFAULT_WINDOW_MONTHS)
    }
}

/// 🩹 A partial filter update. Only what is set gets changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    selectors: Vec<(TicketField, String)>,
}

impl FilterPatch {
    /// Set one dropdown. Later calls for the same field win.
    pub fn with(mut self, field: TicketField, value: impl Into<String>) -> Self {
        self.selectors.push((field, value.into()));
        self
    }

    /// Set both ends of the date window.
    pub fn with_date_range(mut self, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.selectors.is_empty()
    }
}

/// 🚦 Filter with the default undated policy (undated tickets are excluded).
pub fn filter_tickets(tickets: &[CanonicalTicket], state: &FilterState) -> Vec<CanonicalTicket> {
    filter_tickets_with(tickets, state, UndatedPolicy::Exclude)
}

/// 🚦 Stable filter: keeps input order, clones the survivors.
pub fn filter_tickets_with(
    tickets: &[CanonicalTicket],
    state: &FilterState,
    undated: UndatedPolicy,
) -> Vec<CanonicalTicket> {
    tickets
        .iter()
        .filter(|ticket| matches_filters(ticket, state, undated))
        .cloned()
        .collect()
}

/// ✅ Does one ticket pass every condition?
pub fn matches_filters(ticket: &CanonicalTicket, state: &FilterState, undated: UndatedPolicy) -> bool {
    in_date_window(ticket, state, undated)
        && TicketField::ALL_FIELDS
            .into_iter()
            .all(|field| matches_selector(field, ticket.field(field), state.selector(field)))
}

fn in_date_window(ticket: &CanonicalTicket, state: &FilterState, undated: UndatedPolicy) -> bool {
    match ticket.parsed_date() {
        Some(when) => state.start_date <= when && when <= state.end_date,
        None => undated == UndatedPolicy::Include,
    }
}

fn matches_selector(field: TicketField, value: &str, selector: &str) -> bool {
    if selector == ALL {
        return true;
    }
    match field {
        TicketField::Status => matches_status_selector(value, selector),
        _ => value == selector,
    }
}

fn matches_status_selector(status: &str, selector: &str) -> bool {
    match selector {
        "Open" => OPEN_STATUSES.contains(&status),
        "Closed" => CLOSED_STATUSES.contains(&status),
        exact => status == exact,
    }
}
