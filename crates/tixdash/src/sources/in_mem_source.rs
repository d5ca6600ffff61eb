//! # Previously, on tixdash...
//!
//! 🎬 Nobody had exported the spreadsheet yet. The dashboard stood there, empty,
//! like a help desk at 7:59 AM. Someone had to provide some tickets. Someone had
//! to make them up.
//!
//! That someone was this module.
//!
//! [`InMemorySource`] yields one small demo batch, once. The rows deliberately use
//! mismatched column names ("AssignedTo" vs "Assigned to", "Status" vs "State"),
//! a missing client, and an unparseable date, so the normalizer has something to
//! chew on. Dates are relative to "now" so the default window actually shows them.
//!
//! ⚠️ This is for demos and tests. If you're running it in prod, the tickets are fake.

use anyhow::Result;
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};

use super::RowSource;
use crate::common::RawRow;

/// 📦 The world's most optimistic ticket queue.
#[derive(Debug, Default)]
pub struct InMemorySource {
    // -- true = "I already gave you everything I had, please stop asking"
    has_yielded: bool,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self { has_yielded: false }
    }
}

fn days_ago(days: i64) -> String {
    (Utc::now() - TimeDelta::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

impl RowSource for InMemorySource {
    /// 🎯 First call: the demo batch. Every call after: nothing. One batch per customer.
    fn load_rows(&mut self) -> Result<Vec<RawRow>> {
        if self.has_yielded {
            return Ok(Vec::new());
        }
        self.has_yielded = true;

        let demo = json!([
            {"id": "INC-1001", "Ticket Number": "1001", "Technology": "VPN", "Client": "Acme",
             "Ticket Type": "Incident", "AssignedTo": "Dana", "Status": "Open", "Date": days_ago(2)},
            {"id": "INC-1002", "Ticket Number": "1002", "Technology": "Email", "Client": "Zeta",
             "Ticket Type": "Request", "Assigned to": "Lee", "Status": "Closed", "Date": days_ago(10)},
            {"id": "INC-1003", "TicketNumber": 1003, "Tech": "Email", "Customer": "Acme",
             "Type": "Incident", "Assignee": "Dana", "State": "InProgress", "Created": days_ago(20)},
            {"id": "INC-1004", "Ticket Number": "1004", "Technology": "Printers", "Client": "Initech",
             "Ticket Type": "Incident", "Status": "Resolved", "Date": days_ago(45), "Priority": "P1"},
            {"id": "INC-1005", "Ticket Number": "1005", "Technology": "VPN",
             "Ticket Type": "Request", "AssignedTo": "Sam", "Date": days_ago(5)},
            {"id": "INC-1006", "Ticket Number": "1006", "Technology": "Email", "Client": "Zeta",
             "Ticket Type": "Incident", "AssignedTo": "Lee", "Status": "Open", "Date": "sometime last spring"}
        ]);

        Ok(match demo {
            Value::Array(entries) => entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(row) => Some(row),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }
}
