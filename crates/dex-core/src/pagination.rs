//! Page accumulation for the list endpoint.
//!
//! [`PaginationCoordinator`] owns the fetched pages and guarantees that at most
//! one list request is outstanding. Pages are requested strictly in increasing
//! index order and appended, so `next_page_index() == pages.len()` always holds.
//!
//! The coordinator never schedules work itself: the presentation layer calls
//! [`PaginationCoordinator::fetch_next`] on an edge trigger (a sentinel coming into
//! view, a "more" keypress, a CLI loop). Calls that arrive while a fetch is in
//! flight, or after the last page, are no-ops.
//!
//! ## Failures
//!
//! A failed fetch sets a persistent error indicator and keeps every page already
//! accumulated. Nothing is retried automatically; because the in-flight flag is
//! always released, the next trigger retries.

use crate::{CatalogApi, ListItem, Liveness, Page};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Observable pagination state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    /// Accumulated pages in index order.
    pub pages: Vec<Page>,
    /// Whether the last response advertised another page.
    pub has_more: bool,
    /// Whether a list request is outstanding.
    pub fetch_in_flight: bool,
    /// Whether the outstanding request is the initial load.
    pub loading_initial: bool,
    /// Persistent error indicator from the most recent failed list fetch.
    pub error: Option<String>,
}

impl PaginationState {
    /// Index of the page the next `fetch_next` requests.
    #[must_use]
    pub fn next_page_index(&self) -> usize {
        self.pages.len()
    }

    /// All accumulated items in arrival order.
    pub fn items(&self) -> impl Iterator<Item = &ListItem> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            has_more: true,
            fetch_in_flight: false,
            loading_initial: false,
            error: None,
        }
    }
}

/// Why a fetch request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Another list request is outstanding.
    InFlight,
    /// The last page has been fetched.
    Exhausted,
    /// The owner retired the coordinator.
    Retired,
}

/// Result of a fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// A page was fetched and applied.
    Fetched {
        /// Index of the applied page.
        page_index: usize,
        /// Number of items on the page.
        items: usize,
    },
    /// No request was made, or its response was discarded.
    Skipped {
        /// Why nothing was applied.
        reason: SkipReason,
    },
    /// The request failed; the error indicator is set.
    Failed {
        /// Error category, as reported by [`crate::Error::category`].
        category: &'static str,
        /// Rendered error.
        message: String,
    },
}

impl FetchOutcome {
    /// Whether a page was applied.
    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }

    const fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }
}

/// Releases the in-flight slot however the fetch ends, including cancellation.
struct InFlightGuard<'a> {
    state: &'a Mutex<PaginationState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.fetch_in_flight = false;
        state.loading_initial = false;
    }
}

/// Owns the sequence of fetched pages.
pub struct PaginationCoordinator {
    api: Arc<dyn CatalogApi>,
    state: Mutex<PaginationState>,
    liveness: Liveness,
}

impl PaginationCoordinator {
    /// Creates an empty coordinator with its own liveness flag.
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self::with_liveness(api, Liveness::new())
    }

    /// Creates an empty coordinator tied to a shared liveness flag.
    pub fn with_liveness(api: Arc<dyn CatalogApi>, liveness: Liveness) -> Self {
        Self {
            api,
            state: Mutex::new(PaginationState::default()),
            liveness,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PaginationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the in-flight slot and returns the page index to request.
    fn begin(&self, initial: bool) -> Result<(InFlightGuard<'_>, usize), SkipReason> {
        if !self.liveness.is_alive() {
            return Err(SkipReason::Retired);
        }

        let mut state = self.lock();
        if state.fetch_in_flight {
            return Err(SkipReason::InFlight);
        }
        if !initial && !state.has_more {
            return Err(SkipReason::Exhausted);
        }

        state.fetch_in_flight = true;
        state.loading_initial = initial;
        let page_index = if initial { 0 } else { state.next_page_index() };
        drop(state);

        Ok((InFlightGuard { state: &self.state }, page_index))
    }

    /// Fetches page 0 and replaces the state with it.
    ///
    /// On failure the error indicator is set and existing pages are untouched. A
    /// later call acts as a manual retry and clears the indicator on success.
    pub async fn load_initial(&self) -> FetchOutcome {
        let (_guard, page_index) = match self.begin(true) {
            Ok(claim) => claim,
            Err(reason) => return FetchOutcome::skipped(reason),
        };

        let result = self.api.fetch_page(page_index).await;
        if !self.liveness.is_alive() {
            debug!("Discarding initial page: coordinator retired");
            return FetchOutcome::skipped(SkipReason::Retired);
        }

        let mut state = self.lock();
        match result {
            Ok(page) => {
                let items = page.items.len();
                state.has_more = page.has_next;
                state.pages = vec![page];
                state.error = None;
                FetchOutcome::Fetched { page_index, items }
            },
            Err(err) => {
                warn!("Initial page load failed: {err}");
                let message = err.to_string();
                state.error = Some(message.clone());
                FetchOutcome::Failed {
                    category: err.category(),
                    message,
                }
            },
        }
    }

    /// Fetches and appends the next page.
    ///
    /// No-op while another fetch is in flight or once the last page is known.
    pub async fn fetch_next(&self) -> FetchOutcome {
        let (_guard, page_index) = match self.begin(false) {
            Ok(claim) => claim,
            Err(reason) => {
                debug!("fetch_next skipped: {reason:?}");
                return FetchOutcome::skipped(reason);
            },
        };

        let result = self.api.fetch_page(page_index).await;
        if !self.liveness.is_alive() {
            debug!("Discarding page {page_index}: coordinator retired");
            return FetchOutcome::skipped(SkipReason::Retired);
        }

        let mut state = self.lock();
        match result {
            Ok(page) => {
                debug_assert_eq!(state.next_page_index(), page_index);
                let items = page.items.len();
                state.has_more = page.has_next;
                state.pages.push(page);
                state.error = None;
                FetchOutcome::Fetched { page_index, items }
            },
            Err(err) => {
                warn!("Page {page_index} failed: {err}");
                let message = err.to_string();
                state.error = Some(message.clone());
                FetchOutcome::Failed {
                    category: err.category(),
                    message,
                }
            },
        }
    }

    /// Retires the coordinator; outstanding responses are discarded.
    pub fn retire(&self) {
        self.liveness.retire();
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PaginationState {
        self.lock().clone()
    }

    /// Accumulated items in arrival order.
    pub fn items(&self) -> Vec<ListItem> {
        self.lock().items().cloned().collect()
    }

    /// Number of accumulated pages.
    pub fn page_count(&self) -> usize {
        self.lock().pages.len()
    }

    /// Whether another page is advertised.
    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    /// Whether a list request is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.lock().fetch_in_flight
    }

    /// The persistent error indicator.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }
}
