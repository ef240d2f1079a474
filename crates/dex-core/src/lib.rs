//! # dex-core
//!
//! Core functionality for dex - a paginated, locally cached client for a public
//! creature-data API (PokeAPI).
//!
//! The crate coordinates incremental pagination of the list endpoint, background
//! prefetch of per-item type tags, and a small key-value cache that persists
//! favorites, resolved type tags, and detail records between runs.
//!
//! ## Architecture
//!
//! - **Identifiers**: numeric ids derived from resource URLs ([`ItemId`])
//! - **Gateway**: the [`CatalogApi`] seam and its `reqwest` implementation ([`Fetcher`])
//! - **Cache**: the [`KeyValueStore`] seam, in-memory and file-backed stores, and the
//!   typed [`CacheStore`] view over them
//! - **Pagination**: [`PaginationCoordinator`], at most one page fetch in flight
//! - **Prefetch**: [`TypePrefetcher`], fills the type cache for the first window of items
//! - **Projection**: [`view::project`], search/filter/sort over accumulated items
//! - **Favorites** and **details**: [`FavoritesManager`], [`DetailLoader`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dex_core::{CacheStore, Fetcher, PaginationCoordinator, ViewQuery, view};
//!
//! # async fn demo() -> dex_core::Result<()> {
//! let api = Arc::new(Fetcher::new()?);
//! let cache = CacheStore::in_memory();
//! let pages = PaginationCoordinator::new(api);
//!
//! pages.load_initial().await;
//! pages.fetch_next().await;
//!
//! let visible = view::project(&pages.items(), &ViewQuery::default(), &cache);
//! println!("{} items visible", visible.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Model
//!
//! List-fetch failures are sticky and surface through the coordinator's error
//! indicator. Detail and prefetch failures are logged and swallowed so the rest of
//! the state stays usable.

/// Configuration loading and environment overrides
pub mod config;
/// Detail panel loading
pub mod detail;
/// Error types and result aliases
pub mod error;
/// Favorites list management
pub mod favorites;
/// HTTP gateway for the list and detail endpoints
pub mod fetcher;
/// Identifier extraction from resource URLs
pub mod id;
/// Liveness flag shared by stateful components
pub mod liveness;
/// Page accumulation with a single in-flight fetch
pub mod pagination;
/// Background type tag prefetching
pub mod prefetch;
/// Local key-value cache stores
pub mod store;
/// Core data types and wire formats
pub mod types;
/// Search, filter, and sort projection
pub mod view;

#[cfg(test)]
#[allow(clippy::unwrap_used, missing_docs)]
mod testing;

pub use config::{ApiConfig, Config, PathsConfig, PrefetchConfig};
pub use detail::{DetailLoader, DetailPanel};
pub use error::{Error, Result};
pub use favorites::{FavoritesManager, Toggled};
pub use fetcher::{CatalogApi, DEFAULT_BASE_URL, Fetcher, PAGE_SIZE};
pub use id::{ItemId, SPRITE_BASE_URL};
pub use liveness::Liveness;
pub use pagination::{FetchOutcome, PaginationCoordinator, PaginationState, SkipReason};
pub use prefetch::{PrefetchReport, TypePrefetcher};
pub use store::{CacheStore, FileStore, KeyValueStore, MemoryStore};
pub use types::*;
pub use view::{SortMode, TypeFilter, TypeLookup, ViewQuery};
