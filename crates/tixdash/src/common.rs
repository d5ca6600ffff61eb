//! 📦 Common data structures, the building blocks of tixdash
//!
//! 🎬 COLD OPEN: INT. SUPPORT DESK, 4:58 PM ON A FRIDAY
//!
//! Somebody exported the ticket queue to a spreadsheet. Somebody else exported it
//! again, from a different tool, with "Assigned to" instead of "AssignedTo". A third
//! person added a column called "Status " with a trailing space, because of course.
//!
//! Rows arrive here as [`RawRow`]s: untrusted, duck-typed, and emotionally unavailable.
//! They leave as [`CanonicalTicket`]s: six fields, always filled in, never null.
//! Everything downstream (facets, filters, selections, metrics) only ever talks to
//! the canonical shape. 🦆

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates::parse_ticket_date;

/// 🧾 One raw spreadsheet row: field name → whatever the exporter felt like emitting.
pub type RawRow = serde_json::Map<String, Value>;

/// 🎯 The catch-all selector. Facets start with it, filters default to it.
pub const ALL: &str = "All";

/// 🤷 Placeholder for any canonical field the row did not provide.
pub const UNKNOWN: &str = "Unknown";

/// 🙋 Placeholder for tickets nobody has claimed yet. Relatable.
pub const UNASSIGNED: &str = "Unassigned";

/// 📅 Placeholder for missing dates. Never parses, so it never lands inside a range.
pub const INVALID_DATE: &str = "Invalid Date";

/// 🏷️ The six filterable canonical fields, in the order facets and selectors list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TicketField {
    TicketNumber,
    Technology,
    Client,
    TicketType,
    AssignedTo,
    Status,
}

impl TicketField {
    /// Every filterable field, in display order.
    pub const ALL_FIELDS: [TicketField; 6] = [
        TicketField::TicketNumber,
        TicketField::Technology,
        TicketField::Client,
        TicketField::TicketType,
        TicketField::AssignedTo,
        TicketField::Status,
    ];

    /// 🔑 The canonical (camelCase) key this field is known by.
    pub fn key(self) -> &'static str {
        match self {
            TicketField::TicketNumber => "ticketNumber",
            TicketField::Technology => "technology",
            TicketField::Client => "client",
            TicketField::TicketType => "ticketType",
            TicketField::AssignedTo => "assignedTo",
            TicketField::Status => "status",
        }
    }

    fn snake_key(self) -> &'static str {
        match self {
            TicketField::TicketNumber => "ticket_number",
            TicketField::Technology => "technology",
            TicketField::Client => "client",
            TicketField::TicketType => "ticket_type",
            TicketField::AssignedTo => "assigned_to",
            TicketField::Status => "status",
        }
    }

    /// 🔍 Resolve a category name (camelCase or snake_case, any case) to a field.
    ///
    /// "Status", "STATUS", "assigned_to", "assignedTo" all find their way home.
    /// Anything else is `None` and gets treated as a pass-through field by the caller.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL_FIELDS.into_iter().find(|field| {
            name.eq_ignore_ascii_case(field.key()) || name.eq_ignore_ascii_case(field.snake_key())
        })
    }
}

impl std::fmt::Display for TicketField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// 🎫 A ticket normalized to the canonical shape.
///
/// The six filterable fields are always non-empty strings: either what the row
/// said, or a documented placeholder. `date` stays as text and gets parsed when
/// a filter actually needs it. Everything else the row carried rides along in
/// `extra`, minus any key that collides with a canonical one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTicket {
    pub id: String,
    pub ticket_number: String,
    pub technology: String,
    pub client: String,
    pub ticket_type: String,
    pub assigned_to: String,
    pub status: String,
    pub date: String,
    /// 🧳 Pass-through raw fields. Opaque to the pipeline.
    #[serde(flatten)]
    pub extra: RawRow,
}

impl CanonicalTicket {
    /// 📖 Borrow the value of one of the six canonical fields.
    pub fn field(&self, field: TicketField) -> &str {
        match field {
            TicketField::TicketNumber => &self.ticket_number,
            TicketField::Technology => &self.technology,
            TicketField::Client => &self.client,
            TicketField::TicketType => &self.ticket_type,
            TicketField::AssignedTo => &self.assigned_to,
            TicketField::Status => &self.status,
        }
    }

    /// 🔍 Look up a field by name: canonical fields first, then pass-through ones.
    ///
    /// Pass-through keys are matched exactly, because raw rows are the wild west
    /// and "Priority" and "priority" may genuinely be two different columns.
    pub fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        if let Some(field) = TicketField::from_name(name) {
            return Some(Cow::Borrowed(self.field(field)));
        }
        match name.trim() {
            n if n.eq_ignore_ascii_case("id") => Some(Cow::Borrowed(&self.id)),
            n if n.eq_ignore_ascii_case("date") => Some(Cow::Borrowed(&self.date)),
            n => self.extra.get(n).and_then(value_text).map(Cow::Owned),
        }
    }

    /// 📅 Parse `date` into a comparable instant. `None` for anything unparseable.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        parse_ticket_date(&self.date)
    }
}

/// 🧽 Turn a raw JSON value into usable text, or `None` if it is blank or garbage.
///
/// Strings are trimmed and must be non-empty. Numbers and booleans are stringified.
/// Null, arrays and objects are not something a ticket field can be.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn a_ticket_with_extras(extra: Value) -> CanonicalTicket {
        CanonicalTicket {
            id: "t-1".to_string(),
            ticket_number: "INC-1".to_string(),
            technology: "Email".to_string(),
            client: "Acme".to_string(),
            ticket_type: "Incident".to_string(),
            assigned_to: "Dana".to_string(),
            status: "Open".to_string(),
            date: "2024-03-01".to_string(),
            extra: extra.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn the_one_where_field_names_answer_to_any_case() {
        assert_eq!(TicketField::from_name("Status"), Some(TicketField::Status));
        assert_eq!(TicketField::from_name("ASSIGNEDTO"), Some(TicketField::AssignedTo));
        assert_eq!(TicketField::from_name("ticket_type"), Some(TicketField::TicketType));
        assert_eq!(TicketField::from_name("priority"), None);
    }

    #[test]
    fn the_one_where_lookup_falls_through_to_the_extras() {
        let ticket = a_ticket_with_extras(json!({"Priority": "P1", "Minutes": 42, "Notes": null}));

        assert_eq!(ticket.lookup("client").as_deref(), Some("Acme"));
        assert_eq!(ticket.lookup("Priority").as_deref(), Some("P1"));
        assert_eq!(ticket.lookup("Minutes").as_deref(), Some("42"));
        assert_eq!(ticket.lookup("Notes"), None, "null is not a value, it's a cry for help");
        assert_eq!(ticket.lookup("nope"), None);
        assert_eq!(ticket.lookup("id").as_deref(), Some("t-1"));
    }

    #[test]
    fn the_one_where_blank_values_are_not_values() {
        assert_eq!(value_text(&json!("  hi  ")), Some("hi".to_string()));
        assert_eq!(value_text(&json!("   ")), None);
        assert_eq!(value_text(&json!(7)), Some("7".to_string()));
        assert_eq!(value_text(&json!(true)), Some("true".to_string()));
        assert_eq!(value_text(&json!([1, 2])), None);
        assert_eq!(value_text(&json!({"nested": "object"})), None);
    }

    #[test]
    fn the_one_where_extras_serialize_next_to_canonical_keys() {
        let ticket = a_ticket_with_extras(json!({"Priority": "P2"}));
        let as_json = serde_json::to_value(&ticket).expect("💀 a ticket should always serialize");
        assert_eq!(as_json["assignedTo"], "Dana");
        assert_eq!(as_json["Priority"], "P2");
    }
}
