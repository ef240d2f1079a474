//! Detail panel loading.
//!
//! Loading is fail-soft: a failed fetch clears the loading flag and leaves the
//! panel empty without surfacing an error.

use crate::{CacheStore, CatalogApi, DetailRecord, ListItem, Liveness};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// What the detail view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailPanel {
    /// The selected item, if any.
    pub selected: Option<ListItem>,
    /// Whether a detail request for `selected` is outstanding.
    pub loading: bool,
    /// The loaded record; `None` while loading or after a failure.
    pub record: Option<DetailRecord>,
}

#[derive(Default)]
struct PanelState {
    panel: DetailPanel,
    // Bumped on every open/close; responses for an older value are stale
    generation: u64,
}

/// Backs the detail view.
pub struct DetailLoader {
    api: Arc<dyn CatalogApi>,
    cache: CacheStore,
    state: Mutex<PanelState>,
    liveness: Liveness,
}

impl DetailLoader {
    /// Creates a loader with nothing selected.
    pub fn new(api: Arc<dyn CatalogApi>, cache: CacheStore) -> Self {
        Self {
            api,
            cache,
            state: Mutex::new(PanelState::default()),
            liveness: Liveness::new(),
        }
    }

    /// Ties the loader to a shared liveness flag.
    #[must_use]
    pub fn with_liveness(mut self, liveness: Liveness) -> Self {
        self.liveness = liveness;
        self
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Selects `item` and loads its details.
    ///
    /// The panel shows the item with `loading` set as soon as this is called.
    /// On success the record is cached under `details:{id}` and shown; on failure
    /// the panel stays empty. Returns the panel as it stands afterwards.
    pub async fn open(&self, item: &ListItem) -> DetailPanel {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.panel = DetailPanel {
                selected: Some(item.clone()),
                loading: true,
                record: None,
            };
            state.generation
        };

        let result = self.api.fetch_detail(&item.url).await;
        if !self.liveness.is_alive() {
            debug!("Discarding details for '{}': loader retired", item.name);
            return self.panel();
        }

        let mut state = self.lock();
        if state.generation != generation {
            debug!("Discarding details for '{}': selection changed", item.name);
            return state.panel.clone();
        }

        state.panel.loading = false;
        match result {
            Ok(record) => {
                if let Err(err) = self.cache.save_details(&record) {
                    warn!("Failed to cache details for {}: {err}", record.id);
                }
                state.panel.record = Some(record);
            },
            Err(err) => {
                warn!("Details unavailable for '{}': {err}", item.name);
            },
        }
        state.panel.clone()
    }

    /// Clears the selection. A response still in flight is discarded.
    pub fn close(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.panel = DetailPanel::default();
    }

    /// The current panel.
    pub fn panel(&self) -> DetailPanel {
        self.lock().panel.clone()
    }
}
