//! 🎫 tixdash: the in-memory pipeline behind a support-ticket dashboard.
//!
//! ```text
//!   raw rows ──▶ normalize ──▶ tickets ──┬──▶ extract_facets (once per load)
//!                                        └──▶ filter_tickets (every filter change)
//!                                                   │
//!                                     filtered view ┼──▶ aggregate
//!                                                   └──▶ select_by_category (on click)
//! ```
//!
//! The pure stages live in their own modules. [`dashboard`] owns the shared state
//! and wires the stages together behind a provider/handle pair. 🦆

pub mod app_config;
pub mod common;
pub mod dashboard;
pub mod dates;
pub mod facets;
pub mod filters;
pub mod metrics;
pub mod normalize;
pub mod report;
pub mod selection;
pub mod sources;

use anyhow::{Context, Result};
use tracing::info;

use crate::app_config::AppConfig;
use crate::dashboard::DashboardProvider;
use crate::filters::FilterPatch;
use crate::sources::{RowSource, SourceBackend};

pub use crate::common::{CanonicalTicket, RawRow, TicketField};
pub use crate::dashboard::{DashboardConfig, DashboardError, DashboardHandle};
pub use crate::facets::{FacetMap, extract_facets};
pub use crate::filters::{FilterState, filter_tickets};
pub use crate::metrics::{Metrics, Summary, aggregate};
pub use crate::normalize::normalize;
pub use crate::selection::{Selection, select_by_category};

/// 🎯 What a one-shot run should show.
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    /// Filter changes to apply on top of the defaults.
    pub patch: FilterPatch,
    /// Drill into `(category, value)` after filtering.
    pub select: Option<(String, String)>,
    /// Print the facet table too.
    pub show_facets: bool,
    /// Print the filtered tickets.
    pub show_tickets: bool,
}

/// 🚀 Load rows from the configured source, run them through the dashboard,
/// and render the result as text.
pub fn run(app_config: AppConfig, query: DashboardQuery) -> Result<String> {
    let mut source = SourceBackend::from_config(&app_config.source);
    let raw_rows = source
        .load_rows()
        .context("💀 Could not load rows from the configured source")?;

    let provider = DashboardProvider::new(app_config.dashboard);
    let dashboard = provider.handle();
    dashboard.load_batch(raw_rows)?;
    if !query.patch.is_empty() {
        dashboard.update_filters(query.patch, true)?;
    }

    let mut sections = vec![
        report::filters_table(&dashboard.filters()?).to_string(),
        report::summary_table(&dashboard.summary()?).to_string(),
    ];
    if query.show_facets {
        sections.push(report::facets_table(&dashboard.facets()?).to_string());
    }
    if query.show_tickets {
        sections.push(report::tickets_table(&dashboard.filtered()?).to_string());
    }
    if let Some((category, value)) = &query.select {
        let selection = dashboard.select_by_category(category, value)?;
        sections.push(report::selection_report(&selection));
    }

    info!("✅ rendered dashboard for {} tickets", dashboard.tickets()?.len());
    Ok(sections.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_the_demo_runs_end_to_end() -> Result<()> {
        let rendered = run(
            AppConfig::default(),
            DashboardQuery {
                select: Some(("status".to_string(), "open".to_string())),
                show_facets: true,
                show_tickets: true,
                ..DashboardQuery::default()
            },
        )?;

        // -- 🧪 6 demo rows, one with an unparseable date: 5 in view, 3 of them open
        assert!(rendered.contains("🎯 status = open (3 tickets)"), "got\n{rendered}");
        assert!(rendered.contains("INC-1003"));
        assert!(rendered.contains("Unassigned"));
        Ok(())
    }

    #[test]
    fn the_one_where_a_filter_narrows_the_demo() -> Result<()> {
        let rendered = run(
            AppConfig::default(),
            DashboardQuery {
                patch: FilterPatch::default().with(TicketField::Client, "Acme"),
                select: Some(("client".to_string(), "acme".to_string())),
                ..DashboardQuery::default()
            },
        )?;
        assert!(rendered.contains("🎯 client = acme (2 tickets)"), "got\n{rendered}");
        Ok(())
    }
}
