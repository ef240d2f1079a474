//! Background resolution of type tags.
//!
//! Type filtering needs each item's types, which only the detail endpoint knows.
//! [`TypePrefetcher`] resolves them for the leading window of accumulated items
//! (arrival order, not id order) and writes them to the type cache, so filtering
//! is useful before any detail has been opened.
//!
//! A run happens once per distinct window; it does not follow the window as more
//! pages arrive. Failures are logged and swallowed: an item without a cache entry
//! simply matches every type filter.

use crate::{CacheStore, CatalogApi, ItemId, ListItem, Liveness};
use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Number of leading items whose types are prefetched.
pub const DEFAULT_PREFETCH_WINDOW: usize = 60;
/// Maximum detail requests in flight during one run.
pub const DEFAULT_PREFETCH_CONCURRENCY: usize = 8;

/// Counts from a prefetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefetchReport {
    /// Items inside the window.
    pub considered: usize,
    /// Items that already had a type entry.
    pub already_cached: usize,
    /// Items whose types were fetched and stored.
    pub resolved: usize,
    /// Items whose fetch or store failed.
    pub failed: usize,
    /// Items without a derivable identifier.
    pub skipped_invalid: usize,
}

/// Fills the type cache for the first window of known items.
pub struct TypePrefetcher {
    api: Arc<dyn CatalogApi>,
    cache: CacheStore,
    window: usize,
    concurrency: usize,
    liveness: Liveness,
    last_window: Mutex<Option<Vec<ItemId>>>,
}

impl TypePrefetcher {
    /// Creates a prefetcher with the default window and concurrency.
    pub fn new(api: Arc<dyn CatalogApi>, cache: CacheStore) -> Self {
        Self {
            api,
            cache,
            window: DEFAULT_PREFETCH_WINDOW,
            concurrency: DEFAULT_PREFETCH_CONCURRENCY,
            liveness: Liveness::new(),
            last_window: Mutex::new(None),
        }
    }

    /// Sets the number of leading items considered.
    #[must_use]
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the request concurrency bound (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Ties the prefetcher to a shared liveness flag.
    #[must_use]
    pub fn with_liveness(mut self, liveness: Liveness) -> Self {
        self.liveness = liveness;
        self
    }

    /// Resolves types for the leading window of `items`.
    ///
    /// Returns `None` when this exact window was already processed.
    pub async fn run(&self, items: &[ListItem]) -> Option<PrefetchReport> {
        let window = &items[..items.len().min(self.window)];

        let mut report = PrefetchReport {
            considered: window.len(),
            ..PrefetchReport::default()
        };
        let mut ids = Vec::with_capacity(window.len());
        let mut pending = Vec::new();

        for item in window {
            match item.id() {
                Ok(id) => {
                    ids.push(id);
                    if self.cache.has_types(id) {
                        report.already_cached += 1;
                    } else {
                        pending.push((id, item.url.as_str()));
                    }
                },
                Err(err) => {
                    debug!("Skipping prefetch for '{}': {err}", item.name);
                    report.skipped_invalid += 1;
                },
            }
        }

        if !self.claim_window(ids) {
            debug!("Type prefetch already ran for this window");
            return None;
        }

        let results: Vec<bool> = stream::iter(pending)
            .map(|(id, url)| self.resolve(id, url))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for resolved in results {
            if resolved {
                report.resolved += 1;
            } else {
                report.failed += 1;
            }
        }

        info!(
            "Type prefetch: {} resolved, {} cached, {} failed",
            report.resolved, report.already_cached, report.failed
        );
        Some(report)
    }

    /// Records `ids` as the processed window; false when it already was.
    fn claim_window(&self, mut ids: Vec<ItemId>) -> bool {
        ids.sort_unstable();
        ids.dedup();

        let mut last = self
            .last_window
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if last.as_ref() == Some(&ids) {
            return false;
        }
        // An empty window (nothing loaded yet) must not block the first real run
        if !ids.is_empty() {
            *last = Some(ids);
        }
        true
    }

    async fn resolve(&self, id: ItemId, url: &str) -> bool {
        let record = match self.api.fetch_detail(url).await {
            Ok(record) => record,
            Err(err) => {
                warn!("Type prefetch failed for {id}: {err}");
                return false;
            },
        };

        if !self.liveness.is_alive() {
            debug!("Discarding types for {id}: prefetcher retired");
            return false;
        }

        match self.cache.save_types(id, &record.types) {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to cache types for {id}: {err}");
                false
            },
        }
    }
}
