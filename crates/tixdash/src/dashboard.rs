//! 🎬 *[camera pans across a wall of monitors, each showing a ticket count]*
//! 🎬 "In a world where every panel needs the same tickets..."
//! 🎬 "One provider dared to own them all."
//! 🎬 *[record scratch]* 🦆
//!
//! 📦 The dashboard state container. It owns the shared state: tickets, facets,
//! filters, the filtered view, metrics, the current selection and a handful of
//! panel flags. Consumers never touch it directly. They get a [`DashboardHandle`]
//! from the [`DashboardProvider`] and call the control surface on that.
//!
//! 🧠 Knowledge graph:
//! - `DashboardProvider` holds the only strong `Rc`. Drop it and the state is gone.
//! - `DashboardHandle` holds a `Weak`. Every call upgrades it first; a handle whose
//!   provider is gone (or never existed) gets [`DashboardError::OutsideProvider`].
//!   That is a wiring bug, not a data problem, so it is loud on purpose.
//! - Every update replaces fields wholesale. The filtered view is an `Rc<[_]>`
//!   swapped in one piece, never edited in place.
//! - Single-threaded and synchronous. No locks, no awaits, no drama.
//!
//! ⚠️ Pure computation lives in `filters`, `selection`, `metrics`. This module only
//! decides WHEN to run them and WHERE to put the result.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::common::{CanonicalTicket, RawRow};
use crate::facets::{FacetMap, extract_facets};
use crate::filters::{
    DEFAULT_WINDOW_MONTHS, FilterPatch, FilterState, UndatedPolicy, filter_tickets_with,
};
use crate::metrics::{Metrics, Summary, aggregate};
use crate::normalize::normalize;
use crate::selection::{Selection, select_by_category};

/// 🕰️ Where "now" comes from. `Utc::now` in real life, something frozen in tests.
pub type Clock = fn() -> DateTime<Utc>;

// -- 📂 DashboardConfig lives next to the dashboard that uses it. no scavenger hunts at 2am.
/// 🔧 Knobs for the dashboard.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    /// 📆 How far back the default date window reaches.
    #[serde(default = "default_window_months")]
    pub window_months: u32,
    /// 📅 Whether undated tickets may pass the date check.
    #[serde(default)]
    pub undated: UndatedPolicy,
}

fn default_window_months() -> u32 {
    DEFAULT_WINDOW_MONTHS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_months: DEFAULT_WINDOW_MONTHS,
            undated: UndatedPolicy::default(),
        }
    }
}

/// 💀 The one error the dashboard raises.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DashboardError {
    #[error(
        "dashboard handle used outside of a live DashboardProvider; \
         create the provider first and keep it alive while handles are in use"
    )]
    OutsideProvider,
}

#[derive(Debug)]
struct DashboardState {
    config: DashboardConfig,
    clock: Clock,
    tickets: Rc<[CanonicalTicket]>,
    facets: FacetMap,
    /// 🎛️ What the filter controls currently say.
    filters: FilterState,
    /// ✅ What the filtered view was last computed with.
    applied: FilterState,
    filtered: Rc<[CanonicalTicket]>,
    metrics: Metrics,
    selection: Option<Selection>,
    panel_open: bool,
    filters_visible: bool,
    loading: bool,
}

impl DashboardState {
    fn new(config: DashboardConfig, clock: Clock) -> Self {
        let filters = FilterState::default_window(clock(), config.window_months);
        Self {
            config,
            clock,
            tickets: Rc::from(Vec::new()),
            facets: FacetMap::default(),
            applied: filters.clone(),
            filters,
            filtered: Rc::from(Vec::new()),
            metrics: Metrics::default(),
            selection: None,
            panel_open: false,
            filters_visible: true,
            loading: false,
        }
    }

    fn default_filters(&self) -> FilterState {
        FilterState::default_window((self.clock)(), self.config.window_months)
    }

    fn replace_tickets(&mut self, tickets: Vec<CanonicalTicket>) {
        self.tickets = Rc::from(tickets);
        self.facets = extract_facets(&self.tickets);
        self.clear_selection();
        self.apply();
    }

    fn apply(&mut self) {
        self.applied = self.filters.clone();
        self.filtered = Rc::from(filter_tickets_with(
            &self.tickets,
            &self.applied,
            self.config.undated,
        ));
        self.metrics = aggregate(&self.filtered);
        // -- 📌 a selection is always a slice of the current view, so re-run it against the new one
        if let Some(selection) = self.selection.as_mut() {
            selection.tickets =
                select_by_category(&self.filtered, &selection.category, &selection.value);
        }
        debug!(
            "🚦 applied filters: {} of {} tickets pass ({} open, {} resolved)",
            self.metrics.total,
            self.tickets.len(),
            self.metrics.open,
            self.metrics.resolved
        );
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.panel_open = false;
    }
}

/// 🔒 Clears the loading flag when dropped, whichever way the load exits.
struct LoadingGuard<'a> {
    state: &'a RefCell<DashboardState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        // -- try_borrow_mut: if we're unwinding mid-borrow, a second panic helps nobody
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.loading = false;
        }
    }
}

/// 🏠 Owns the dashboard state. Keep it alive as long as any handle is in use.
#[derive(Debug)]
pub struct DashboardProvider {
    state: Rc<RefCell<DashboardState>>,
}

impl DashboardProvider {
    /// 🚀 A provider with the real clock.
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_clock(config, Utc::now)
    }

    /// 🕰️ A provider with an injected clock, for when "now" needs to hold still.
    pub fn with_clock(config: DashboardConfig, clock: Clock) -> Self {
        Self {
            state: Rc::new(RefCell::new(DashboardState::new(config, clock))),
        }
    }

    /// 🎟️ Hand out a handle. Handles are cheap; clone them freely.
    pub fn handle(&self) -> DashboardHandle {
        DashboardHandle {
            state: Rc::downgrade(&self.state),
        }
    }
}

/// 🎟️ The control surface. Every method fails with
/// [`DashboardError::OutsideProvider`] once the provider is gone.
///
/// `DashboardHandle::default()` is a handle that was never attached to a provider,
/// which is exactly as useful as it sounds.
#[derive(Debug, Clone, Default)]
pub struct DashboardHandle {
    state: Weak<RefCell<DashboardState>>,
}

impl DashboardHandle {
    fn upgrade(&self) -> Result<Rc<RefCell<DashboardState>>, DashboardError> {
        self.state.upgrade().ok_or(DashboardError::OutsideProvider)
    }

    fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> Result<R, DashboardError> {
        let state = self.upgrade()?;
        let state = state.borrow();
        Ok(f(&state))
    }

    fn write<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> Result<R, DashboardError> {
        let state = self.upgrade()?;
        let mut state = state.borrow_mut();
        Ok(f(&mut state))
    }

    // ===== Control surface =====

    /// 📥 Replace the ticket set with a freshly normalized batch.
    ///
    /// Recomputes facets and the filtered view, drops any selection. The loading
    /// flag is raised for the duration and cleared on every exit path.
    pub fn load_batch(&self, raw_rows: Vec<RawRow>) -> Result<(), DashboardError> {
        let cell = self.upgrade()?;
        cell.borrow_mut().loading = true;
        let _loading = LoadingGuard { state: &cell };

        let row_count = raw_rows.len();
        let tickets = normalize(raw_rows);
        cell.borrow_mut().replace_tickets(tickets);
        info!("📥 loaded a batch of {} tickets", row_count);
        Ok(())
    }

    /// 🧩 Merge a partial filter update. With `apply_immediately` the view is
    /// recomputed now; without it the change is staged until [`Self::apply_filters`].
    pub fn update_filters(
        &self,
        patch: FilterPatch,
        apply_immediately: bool,
    ) -> Result<(), DashboardError> {
        self.write(|state| {
            trace!("🧩 filter patch: {:?} (apply now: {})", patch, apply_immediately);
            state.filters.merge(patch);
            if apply_immediately {
                state.apply();
            }
        })
    }

    /// ✅ Apply whatever the filter controls currently say.
    pub fn apply_filters(&self) -> Result<(), DashboardError> {
        self.write(DashboardState::apply)
    }

    /// 🔄 Back to the default window and all-"All" selectors. Clears the selection.
    pub fn reset_filters(&self) -> Result<(), DashboardError> {
        self.write(|state| {
            state.filters = state.default_filters();
            state.clear_selection();
            state.apply();
            info!("🔄 filters reset to the default {}-month window", state.config.window_months);
        })
    }

    /// 🎯 Drill into `(category, value)` within the current filtered view.
    ///
    /// Records the selection, opens the detail panel, and returns the selection.
    pub fn select_by_category(
        &self,
        category: &str,
        value: &str,
    ) -> Result<Selection, DashboardError> {
        self.write(|state| {
            let selection = Selection {
                category: category.to_string(),
                value: value.to_string(),
                tickets: select_by_category(&state.filtered, category, value),
            };
            debug!(
                "🎯 selected {} tickets for {}={}",
                selection.tickets.len(),
                category,
                value
            );
            state.selection = Some(selection.clone());
            state.panel_open = true;
            selection
        })
    }

    /// 🗑️ Dismiss the selection and close the detail panel.
    pub fn clear_selection(&self) -> Result<(), DashboardError> {
        self.write(DashboardState::clear_selection)
    }

    /// 👀 Show or hide the filter controls. Returns the new visibility.
    pub fn toggle_filters_panel(&self) -> Result<bool, DashboardError> {
        self.write(|state| {
            state.filters_visible = !state.filters_visible;
            state.filters_visible
        })
    }

    // ===== Queries =====

    /// 📋 Metrics plus the number of active (non-"All") selectors.
    pub fn summary(&self) -> Result<Summary, DashboardError> {
        self.read(|state| Summary {
            metrics: state.metrics,
            active_filters: state.filters.active_filter_count(),
        })
    }

    /// 📌 The current selection, if someone has drilled in.
    pub fn selection(&self) -> Result<Option<Selection>, DashboardError> {
        self.read(|state| state.selection.clone())
    }

    pub fn facets(&self) -> Result<FacetMap, DashboardError> {
        self.read(|state| state.facets.clone())
    }

    /// 🚦 The filtered view as last applied.
    pub fn filtered(&self) -> Result<Rc<[CanonicalTicket]>, DashboardError> {
        self.read(|state| Rc::clone(&state.filtered))
    }

    /// 🎫 Every loaded ticket, unfiltered.
    pub fn tickets(&self) -> Result<Rc<[CanonicalTicket]>, DashboardError> {
        self.read(|state| Rc::clone(&state.tickets))
    }

    /// 🎛️ What the filter controls say (possibly not yet applied).
    pub fn filters(&self) -> Result<FilterState, DashboardError> {
        self.read(|state| state.filters.clone())
    }

    /// ✅ What the filtered view was computed with.
    pub fn applied_filters(&self) -> Result<FilterState, DashboardError> {
        self.read(|state| state.applied.clone())
    }

    pub fn is_loading(&self) -> Result<bool, DashboardError> {
        self.read(|state| state.loading)
    }

    pub fn is_panel_open(&self) -> Result<bool, DashboardError> {
        self.read(|state| state.panel_open)
    }

    pub fn filters_visible(&self) -> Result<bool, DashboardError> {
        self.read(|state| state.filters_visible)
    }
}
