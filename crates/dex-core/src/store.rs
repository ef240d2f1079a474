//! Local key-value cache.
//!
//! The core only needs `get`/`set` over string keys and values, so persistence is
//! injected through [`KeyValueStore`]. Writes are last-writer-wins with no
//! locking across keys; every write is idempotent per identifier.
//!
//! Three independent caches live in the store:
//!
//! | Key            | Value                                  |
//! |----------------|----------------------------------------|
//! | `favorites`    | JSON array of [`FavoriteEntry`]        |
//! | `type:{id}`    | JSON array of type names               |
//! | `details:{id}` | JSON [`DetailRecord`] (write-only)     |
//!
//! [`CacheStore`] is the typed view the rest of the crate uses.

use crate::{DetailRecord, Error, FavoriteEntry, ItemId, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Key of the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Key of the cached type tags for an item.
#[must_use]
pub fn type_key(id: ItemId) -> String {
    format!("type:{id}")
}

/// Key of the cached detail record for an item.
#[must_use]
pub fn details_key(id: ItemId) -> String {
    format!("details:{id}")
}

/// String key-value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Filesystem store: one JSON file per key under a root directory.
///
/// `:` in a key separates directory levels, so `type:25` lives at
/// `<root>/type/25.json` and `favorites` at `<root>/favorites.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and creates) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| Error::Storage(format!("Failed to create cache directory: {e}")))?;
        Ok(Self { root })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sanitize_segment(segment: &str) -> String {
        // Keep a conservative character set so keys can never escape the root
        let mut sanitized: String = segment
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        while sanitized.contains("..") {
            sanitized = sanitized.replace("..", "_");
        }
        sanitized
    }

    /// Resolves the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let segments: Vec<String> = key.split(':').map(Self::sanitize_segment).collect();
        if segments.iter().any(|s| s.is_empty() || s == ".") {
            return Err(Error::Storage(format!("Invalid cache key '{key}'")));
        }

        let mut path = self.root.clone();
        let (file, dirs) = segments
            .split_last()
            .ok_or_else(|| Error::Storage(format!("Invalid cache key '{key}'")))?;
        for dir in dirs {
            path.push(dir);
        }
        path.push(format!("{file}.json"));
        Ok(path)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create cache directory: {e}")))?;
        }

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)
            .map_err(|e| Error::Storage(format!("Failed to write {key}: {e}")))?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to replace {key}: {e}")))?;
        }
        fs::rename(&tmp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to commit {key}: {e}")))?;

        debug!("Saved {}", key);
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`] holding the favorites, type, and detail caches.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl CacheStore {
    /// Wraps an existing store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cache backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Cache backed by a [`FileStore`] at `root`.
    pub fn on_disk(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(Arc::new(FileStore::open(root)?)))
    }

    /// The stored favorites, most recently added first.
    ///
    /// Missing or unreadable data yields an empty list.
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        match self.store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable favorites: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load favorites: {e}");
                Vec::new()
            },
        }
    }

    /// Replaces the stored favorites.
    pub fn save_favorites(&self, favorites: &[FavoriteEntry]) -> Result<()> {
        let json = serde_json::to_string(favorites)?;
        self.store.set(FAVORITES_KEY, &json)
    }

    /// The cached type tags for `id`.
    ///
    /// `None` means unknown: never resolved, or the entry could not be read.
    pub fn types(&self, id: ItemId) -> Option<Vec<String>> {
        let raw = match self.store.get(&type_key(id)) {
            Ok(raw) => raw?,
            Err(e) => {
                debug!("Type cache read failed for {id}: {e}");
                return None;
            },
        };
        match serde_json::from_str(&raw) {
            Ok(types) => Some(types),
            Err(e) => {
                debug!("Unreadable type cache entry for {id}: {e}");
                None
            },
        }
    }

    /// Whether a type entry exists for `id`, readable or not.
    pub fn has_types(&self, id: ItemId) -> bool {
        matches!(self.store.get(&type_key(id)), Ok(Some(_)))
    }

    /// Stores the type tags for `id`.
    pub fn save_types(&self, id: ItemId, types: &[String]) -> Result<()> {
        let json = serde_json::to_string(types)?;
        self.store.set(&type_key(id), &json)
    }

    /// Stores a full detail record under its identifier.
    pub fn save_details(&self, record: &DetailRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.store.set(&details_key(record.id), &json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn fav(id: u32, name: &str) -> FavoriteEntry {
        FavoriteEntry {
            id: ItemId::new(id),
            name: name.into(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("cache")).unwrap();

        store.set("favorites", "[]").unwrap();
        store.set("type:25", r#"["electric"]"#).unwrap();

        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            store.get("type:25").unwrap().as_deref(),
            Some(r#"["electric"]"#)
        );
        assert_eq!(store.get("type:26").unwrap(), None);
        assert!(dir.path().join("cache/type/25.json").exists());
        assert!(!dir.path().join("cache/type/25.json.tmp").exists());
    }

    #[test]
    fn test_file_store_key_sanitization() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let path = store.path_for("type:../../etc/passwd").unwrap();
        assert!(path.starts_with(dir.path()));

        assert!(store.path_for("type:").is_err());
        assert!(store.path_for("").is_err());
    }

    #[test]
    fn test_favorites_round_trip() {
        let cache = CacheStore::in_memory();
        assert!(cache.favorites().is_empty());

        let favorites = vec![fav(25, "pikachu"), fav(1, "bulbasaur")];
        cache.save_favorites(&favorites).unwrap();
        assert_eq!(cache.favorites(), favorites);
    }

    #[test]
    fn test_unreadable_favorites_are_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(FAVORITES_KEY, "{corrupt").unwrap();
        let cache = CacheStore::new(store);
        assert!(cache.favorites().is_empty());
    }

    #[test]
    fn test_types_unknown_until_written() {
        let cache = CacheStore::in_memory();
        let id = ItemId::new(4);
        assert_eq!(cache.types(id), None);
        assert!(!cache.has_types(id));

        cache.save_types(id, &["fire".to_string()]).unwrap();
        assert_eq!(cache.types(id), Some(vec!["fire".to_string()]));
        assert!(cache.has_types(id));
    }

    #[test]
    fn test_unreadable_types_are_unknown() {
        let store = Arc::new(MemoryStore::new());
        store.set(&type_key(ItemId::new(9)), "not json").unwrap();
        let cache = CacheStore::new(store);
        assert_eq!(cache.types(ItemId::new(9)), None);
        assert!(cache.has_types(ItemId::new(9)));
    }

    #[test]
    fn test_save_details_key() {
        let store = Arc::new(MemoryStore::new());
        let cache = CacheStore::new(store.clone());
        let record = DetailRecord {
            id: ItemId::new(150),
            name: "mewtwo".into(),
            types: vec!["psychic".into()],
            stats: Vec::new(),
            moves: Vec::new(),
            height_decimeters: 20,
            weight_hectograms: 1220,
        };
        cache.save_details(&record).unwrap();

        let raw = store.get("details:150").unwrap().unwrap();
        let decoded: DetailRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_on_disk_cache_survives_reopen() {
        let dir = tempdir().unwrap();
        CacheStore::on_disk(dir.path())
            .unwrap()
            .save_favorites(&[fav(7, "squirtle")])
            .unwrap();

        let reopened = CacheStore::on_disk(dir.path()).unwrap();
        assert_eq!(reopened.favorites(), vec![fav(7, "squirtle")]);
    }
}
