//! Command implementations.

mod browse;
mod completions;
mod favorites;
mod prefetch;
mod show;

pub use browse::browse;
pub use completions::generate;
pub use favorites::{list_favorites, toggle_favorite};
pub use prefetch::prefetch;
pub use show::show;

use anyhow::{Result, anyhow};
use dex_core::{
    CacheStore, CatalogApi, Config, FetchOutcome, Fetcher, PAGE_SIZE, PaginationCoordinator,
    TypePrefetcher,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::{CliError, ErrorCategory};

/// Everything a command needs: configuration, gateway, and cache.
pub struct Session {
    pub config: Config,
    pub fetcher: Arc<Fetcher>,
    pub cache: CacheStore,
}

impl Session {
    /// Loads the configuration and opens the on-disk cache.
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path).map_err(CliError::from)?;
        let fetcher = Fetcher::from_config(&config.api).map_err(CliError::from)?;
        let cache = CacheStore::on_disk(&config.paths.data_dir).map_err(CliError::from)?;
        debug!(
            "Session: api={} data_dir={}",
            fetcher.base_url(),
            config.paths.data_dir.display()
        );

        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
            cache,
        })
    }

    pub fn api(&self) -> Arc<dyn CatalogApi> {
        self.fetcher.clone()
    }

    pub fn prefetcher(&self) -> TypePrefetcher {
        TypePrefetcher::new(self.api(), self.cache.clone())
            .with_window(self.config.prefetch.window)
            .with_concurrency(self.config.prefetch.concurrency)
    }

    /// Pages needed to cover the prefetch window.
    pub fn window_pages(&self) -> usize {
        self.config.prefetch.window.div_ceil(PAGE_SIZE).max(1)
    }
}

/// Loads page 0, then further pages until `target` pages are held.
///
/// A failed first page is an error. A later failure stops loading and is left on
/// the coordinator's error indicator.
async fn load_pages(pages: &PaginationCoordinator, target: usize) -> Result<()> {
    if let FetchOutcome::Failed { category, message } = pages.load_initial().await {
        return Err(CliError::new(
            ErrorCategory::from_core_category(category),
            anyhow!("Failed to load the first page: {message}"),
        )
        .into());
    }

    while pages.page_count() < target {
        match pages.fetch_next().await {
            FetchOutcome::Fetched { .. } => {},
            FetchOutcome::Skipped { reason } => {
                debug!("Stopped loading: {reason:?}");
                break;
            },
            FetchOutcome::Failed { .. } => break,
        }
    }
    Ok(())
}
