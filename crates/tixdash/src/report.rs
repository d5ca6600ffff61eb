//! 📊 report.rs: the dashboard, minus the dashboard.
//!
//! No cards, no badges, no dark mode. Just tables in a terminal, courtesy of
//! comfy-table, for whoever is running the CLI and wants to see the numbers.
//!
//! 🦆 The duck prefers tables with lumbar support.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use crate::common::{CanonicalTicket, TicketField};
use crate::facets::FacetMap;
use crate::filters::FilterState;
use crate::metrics::Summary;
use crate::selection::Selection;

fn a_fresh_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn count_cell(count: usize) -> Cell {
    Cell::new(count).set_alignment(CellAlignment::Right)
}

/// 📋 Total / open / resolved, plus the active filter badge.
pub fn summary_table(summary: &Summary) -> Table {
    let mut table = a_fresh_table();
    table.set_header(vec!["Total", "Open", "Resolved", "Active filters"]);
    table.add_row(vec![
        count_cell(summary.metrics.total),
        count_cell(summary.metrics.open),
        count_cell(summary.metrics.resolved),
        count_cell(summary.active_filters),
    ]);
    table
}

/// 🎛️ The filter controls as they currently stand.
pub fn filters_table(filters: &FilterState) -> Table {
    let mut table = a_fresh_table();
    table.set_header(vec!["Filter", "Value"]);
    table.add_row(vec!["from".to_string(), filters.start_date.format("%Y-%m-%d %H:%M").to_string()]);
    table.add_row(vec!["to".to_string(), filters.end_date.format("%Y-%m-%d %H:%M").to_string()]);
    for field in TicketField::ALL_FIELDS {
        table.add_row(vec![field.key().to_string(), filters.selector(field).to_string()]);
    }
    table
}

/// 🗂️ One row per field, values in first-seen order.
pub fn facets_table(facets: &FacetMap) -> Table {
    let mut table = a_fresh_table();
    table.set_header(vec!["Field", "Values"]);
    for (field, values) in facets.iter() {
        table.add_row(vec![field.key().to_string(), values.join(", ")]);
    }
    table
}

/// 🎫 The tickets themselves. Only canonical columns; extras stay backstage.
pub fn tickets_table(tickets: &[CanonicalTicket]) -> Table {
    let mut table = a_fresh_table();
    let mut header = vec!["id"];
    header.extend(TicketField::ALL_FIELDS.iter().map(|field| field.key()));
    header.push("date");
    table.set_header(header);

    for ticket in tickets {
        let mut row = vec![ticket.id.clone()];
        row.extend(TicketField::ALL_FIELDS.iter().map(|field| ticket.field(*field).to_string()));
        row.push(ticket.date.clone());
        table.add_row(row);
    }
    table
}

/// 📌 A selection with its `(category, value)` tag as a caption.
pub fn selection_report(selection: &Selection) -> String {
    format!(
        "🎯 {} = {} ({} tickets)\n{}",
        selection.category,
        selection.value,
        selection.tickets.len(),
        tickets_table(&selection.tickets)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::extract_facets;
    use crate::metrics::Metrics;
    use crate::normalize::normalize;
    use serde_json::json;

    fn some_tickets() -> Vec<CanonicalTicket> {
        let rows = vec![
            json!({"id": "INC-7", "Client": "Acme", "Status": "Open"}),
            json!({"id": "INC-8", "Client": "Zeta", "Status": "Resolved"}),
        ];
        normalize(rows.into_iter().filter_map(|row| row.as_object().cloned()).collect())
    }

    #[test]
    fn the_one_where_the_summary_shows_all_four_numbers() {
        let rendered = summary_table(&Summary {
            metrics: Metrics {
                total: 12,
                open: 7,
                resolved: 3,
            },
            active_filters: 2,
        })
        .to_string();

        for needle in ["Total", "Open", "Resolved", "Active filters", "12", "7", "3", "2"] {
            assert!(rendered.contains(needle), "missing {needle} in\n{rendered}");
        }
    }

    #[test]
    fn the_one_where_facets_render_in_first_seen_order() {
        let rendered = facets_table(&extract_facets(&some_tickets())).to_string();
        assert!(rendered.contains("All, Acme, Zeta"), "got\n{rendered}");
        assert!(rendered.contains("assignedTo"));
    }

    #[test]
    fn the_one_where_the_selection_gets_a_caption() {
        let selection = Selection {
            category: "status".to_string(),
            value: "Open".to_string(),
            tickets: some_tickets().into_iter().take(1).collect(),
        };
        let rendered = selection_report(&selection);
        assert!(rendered.starts_with("🎯 status = Open (1 tickets)"));
        assert!(rendered.contains("INC-7"));
        assert!(!rendered.contains("INC-8"));
    }

    #[test]
    fn the_one_where_the_filters_table_lists_every_selector() {
        let rendered = filters_table(&FilterState::default()).to_string();
        for field in TicketField::ALL_FIELDS {
            assert!(rendered.contains(field.key()));
        }
        assert!(rendered.contains("from"));
    }
}
