//! Favorites membership, keyed by identifier.

use crate::{CacheStore, FavoriteEntry, ItemId, ListItem, Result};
use serde::Serialize;
use tracing::debug;

/// Result of [`FavoritesManager::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggled {
    /// The item was prepended.
    Added,
    /// The item was removed.
    Removed,
}

/// Ordered favorites list, most recently added first.
///
/// Every change is written through to the cache before `toggle` returns.
pub struct FavoritesManager {
    cache: CacheStore,
    entries: Vec<FavoriteEntry>,
}

impl FavoritesManager {
    /// Loads the stored list. Unreadable data starts an empty list.
    pub fn load(cache: CacheStore) -> Self {
        let entries = cache.favorites();
        debug!("Loaded {} favorites", entries.len());
        Self { cache, entries }
    }

    /// Removes `item` when its identifier is present, otherwise prepends it.
    ///
    /// Fails when the identifier cannot be derived or the list cannot be
    /// persisted; in the latter case the in-memory list is left unchanged.
    pub fn toggle(&mut self, item: &ListItem) -> Result<Toggled> {
        let entry = FavoriteEntry::from_item(item)?;

        let mut next = self.entries.clone();
        let toggled = if let Some(pos) = next.iter().position(|e| e.id == entry.id) {
            next.remove(pos);
            Toggled::Removed
        } else {
            next.insert(0, entry);
            Toggled::Added
        };

        self.cache.save_favorites(&next)?;
        self.entries = next;
        debug!("Favorite {:?}: {}", toggled, item.name);
        Ok(toggled)
    }

    /// Whether `id` is a favorite.
    pub fn is_favorite(&self, id: ItemId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// The favorites, most recently added first.
    pub fn list(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    /// Number of favorites.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no favorites.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
