//! 🔄 Normalizer: the Rosetta Stone between "whatever the export said" and a ticket 🎭
//!
//! 🎬 COLD OPEN: INT. SHARED DRIVE, FOLDER NAMED "tickets_FINAL_v3 (2)"
//!
//! Three spreadsheets. Three column naming conventions. One of them calls the
//! assignee "AssignedTo", one calls it "Assigned to", and one calls it "Assignee"
//! because the person who set it up had places to be.
//!
//! This module reads each row, walks a prioritized alias list per canonical
//! field, and takes the first usable value. No usable value? The field gets its
//! documented placeholder and life goes on. A bad row never takes the batch down
//! with it. We don't do hostage situations here.
//!
//! ## Merge order 📐
//!
//! Pass-through fields are gathered FIRST, canonical fields are overlaid LAST.
//! Any raw key that collides with a canonical key is dropped from the pass-through
//! map, so a blank or garbage `status` column can never sneak past the normalized
//! value. Get this backwards and "Unknown" loses to `""`. Ask us how we know. 🦆

use tracing::debug;

use crate::common::{
    CanonicalTicket, INVALID_DATE, RawRow, TicketField, UNASSIGNED, UNKNOWN, value_text,
};

/// 🔑 Where a ticket's id might be hiding, most likely spot first.
const ID_ALIASES: &[&str] = &["id", "ID", "Id", "_id"];

/// 📅 Every column name we have seen a ticket date wear.
const DATE_ALIASES: &[&str] = &[
    "date",
    "Date",
    "Created",
    "CreatedDate",
    "Created Date",
    "Date Created",
    "Opened",
];

/// 🗑️ Keys that belong to the canonical record. Raw fields with these names are
/// overlaid by the normalized value and never survive into `extra`.
const CANONICAL_KEYS: &[&str] = &[
    "id",
    "ticketNumber",
    "technology",
    "client",
    "ticketType",
    "assignedTo",
    "status",
    "date",
];

/// 📇 The prioritized raw-key aliases for one canonical field.
fn aliases_for(field: TicketField) -> &'static [&'static str] {
    match field {
        TicketField::TicketNumber => &[
            "ticketNumber",
            "TicketNumber",
            "Ticket Number",
            "Ticket No",
            "Ticket #",
            "Ticket",
        ],
        TicketField::Technology => &["technology", "Technology", "Tech"],
        TicketField::Client => &["client", "Client", "Customer", "Client Name"],
        TicketField::TicketType => &["ticketType", "TicketType", "Ticket Type", "Type"],
        TicketField::AssignedTo => &[
            "assignedTo",
            "AssignedTo",
            "Assigned to",
            "Assigned To",
            "Assignee",
        ],
        TicketField::Status => &["status", "Status", "Ticket Status", "State"],
    }
}

/// 🤷 What a canonical field falls back to when the row had nothing to say.
pub fn default_for(field: TicketField) -> &'static str {
    match field {
        TicketField::AssignedTo => UNASSIGNED,
        _ => UNKNOWN,
    }
}

/// 🔍 First usable value among `aliases`, in priority order.
fn resolve(row: &RawRow, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| row.get(*alias).and_then(value_text))
}

/// 🏭 Normalize a whole batch, preserving row order.
///
/// Never fails. Rows that are missing everything still come out the other side
/// as tickets full of placeholders, which is more than most of us manage on Mondays.
pub fn normalize(raw_rows: Vec<RawRow>) -> Vec<CanonicalTicket> {
    let row_count = raw_rows.len();
    let mut rows_that_needed_defaults = 0usize;

    let tickets: Vec<CanonicalTicket> = raw_rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let (ticket, defaulted) = normalize_row(index, row);
            if defaulted {
                rows_that_needed_defaults += 1;
            }
            ticket
        })
        .collect();

    debug!(
        "🔄 normalized {} rows ({} needed at least one default)",
        row_count, rows_that_needed_defaults
    );
    tickets
}

/// 🎫 Normalize one row. The bool says whether any canonical field was defaulted.
fn normalize_row(index: usize, row: RawRow) -> (CanonicalTicket, bool) {
    let mut defaulted = false;
    let mut canonical = |field: TicketField| {
        resolve(&row, aliases_for(field)).unwrap_or_else(|| {
            defaulted = true;
            default_for(field).to_string()
        })
    };

    let ticket_number = canonical(TicketField::TicketNumber);
    let technology = canonical(TicketField::Technology);
    let client = canonical(TicketField::Client);
    let ticket_type = canonical(TicketField::TicketType);
    let assigned_to = canonical(TicketField::AssignedTo);
    let status = canonical(TicketField::Status);

    let id = resolve(&row, ID_ALIASES).unwrap_or_else(|| format!("ticket-{index}"));
    let date = resolve(&row, DATE_ALIASES).unwrap_or_else(|| INVALID_DATE.to_string());

    // -- 🧳 pass-through first: everything the row carried...
    let mut extra = row;
    // -- ...then the canonical overlay wins every collision
    for key in CANONICAL_KEYS {
        extra.remove(*key);
    }

    let ticket = CanonicalTicket {
        id,
        ticket_number,
        technology,
        client,
        ticket_type,
        assigned_to,
        status,
        date,
        extra,
    };
    (ticket, defaulted)
}
