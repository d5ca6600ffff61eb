//! 🗂️ Facet extraction: which values can you even pick in each dropdown?
//!
//! One pass per field over the loaded tickets, collecting distinct values in the
//! order they were first seen. No sorting, no case folding, no trimming. "Acme"
//! and "acme" are two clients as far as the dropdown is concerned. The seed
//! value is always [`ALL`], so the first option is "don't filter on this".
//!
//! Facets are global: computed once per load, never narrowed by the current
//! filters.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::common::{ALL, CanonicalTicket, TicketField};

/// 📇 Field → ordered distinct values, each list starting with "All".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetMap {
    facets: BTreeMap<TicketField, Vec<String>>,
}

impl FacetMap {
    /// The values for one field. Always at least `["All"]`.
    pub fn values(&self, field: TicketField) -> &[String] {
        self.facets.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Fields in display order with their values.
    pub fn iter(&self) -> impl Iterator<Item = (TicketField, &[String])> {
        self.facets.iter().map(|(field, values)| (*field, values.as_slice()))
    }
}

impl Default for FacetMap {
    fn default() -> Self {
        extract_facets(&[])
    }
}

/// 🔍 Build the facet map for the six canonical fields.
pub fn extract_facets(tickets: &[CanonicalTicket]) -> FacetMap {
    let facets = TicketField::ALL_FIELDS
        .into_iter()
        .map(|field| (field, distinct_values(tickets, field)))
        .collect();
    FacetMap { facets }
}

/// 🧮 First-seen-order distinct values for `field`, seeded with "All".
fn distinct_values(tickets: &[CanonicalTicket], field: TicketField) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::from([ALL]);
    let mut values = vec![ALL.to_string()];
    for ticket in tickets {
        let value = ticket.field(field);
        if seen.insert(value) {
            values.push(value.to_string());
        }
    }
    values
}
