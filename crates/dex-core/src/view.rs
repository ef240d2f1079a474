//! Visible list projection.
//!
//! [`project`] is a pure function of the accumulated items, a [`ViewQuery`], and a
//! [`TypeLookup`]; it never mutates pagination state.

use crate::{CacheStore, ItemId, ListItem};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Types offered in the filter menu. Any other type name is accepted as well.
pub const KNOWN_TYPES: &[&str] = &[
    "grass", "fire", "water", "electric", "psychic", "ice", "dragon", "dark", "fairy",
];

/// Ordering of the visible list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Numeric identifier ascending.
    #[default]
    Id,
    /// Name, accent- and case-insensitive.
    Name,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            other => Err(format!("unknown sort mode '{other}' (expected 'id' or 'name')")),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Name => f.write_str("name"),
        }
    }
}

/// Type restriction on the visible list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// No restriction.
    #[default]
    All,
    /// Items whose cached types contain this (lowercase) type, or whose types are unknown.
    Only(String),
}

impl TypeFilter {
    /// Whether `name` is one of [`KNOWN_TYPES`].
    pub fn is_known(name: &str) -> bool {
        KNOWN_TYPES.contains(&name)
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "" => Err("type filter cannot be empty".to_string()),
            "all" => Ok(Self::All),
            _ => Ok(Self::Only(name)),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(name) => f.write_str(name),
        }
    }
}

/// Search, filter, and sort settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewQuery {
    /// Case-insensitive name substring; empty keeps everything.
    pub query: String,
    /// Type restriction.
    pub filter: TypeFilter,
    /// Ordering.
    pub sort: SortMode,
}

impl ViewQuery {
    /// Query matching names that contain `query`.
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Restricts the view to a type.
    #[must_use]
    pub fn with_filter(mut self, filter: TypeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }
}

/// Source of cached type tags.
pub trait TypeLookup {
    /// Types of `id`, or `None` when unknown.
    fn types_of(&self, id: ItemId) -> Option<Vec<String>>;
}

impl TypeLookup for CacheStore {
    fn types_of(&self, id: ItemId) -> Option<Vec<String>> {
        self.types(id)
    }
}

impl TypeLookup for HashMap<ItemId, Vec<String>> {
    fn types_of(&self, id: ItemId) -> Option<Vec<String>> {
        self.get(&id).cloned()
    }
}

/// Derives the visible list from `items`.
///
/// Filtering by type is fail-open: an item whose types are unknown, or whose
/// identifier cannot be derived, stays visible under every type filter.
pub fn project(items: &[ListItem], query: &ViewQuery, types: &impl TypeLookup) -> Vec<ListItem> {
    let needle = query.query.to_lowercase();

    let mut visible: Vec<ListItem> = items
        .iter()
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .filter(|item| matches_type(item, &query.filter, types))
        .cloned()
        .collect();

    match query.sort {
        SortMode::Id => {
            visible.sort_by_cached_key(|item| item.id().map_or(u64::MAX, |id| u64::from(id.get())));
        },
        SortMode::Name => visible.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
    visible
}

fn matches_type(item: &ListItem, filter: &TypeFilter, types: &impl TypeLookup) -> bool {
    let TypeFilter::Only(wanted) = filter else {
        return true;
    };
    let Ok(id) = item.id() else {
        return true;
    };
    types
        .types_of(id)
        .is_none_or(|known| known.iter().any(|t| t.eq_ignore_ascii_case(wanted)))
}

/// Locale-style name comparison.
///
/// Primary key ignores accents and case; the raw names break ties so the
/// order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
