use crate::{ItemId, Result};
use serde::{Deserialize, Serialize};

/// One entry of the paginated list endpoint.
///
/// The identifier is derived from `url` on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Display name as returned by the API.
    pub name: String,
    /// Resource URL of the item's detail record.
    pub url: String,
}

impl ListItem {
    /// Creates a list item from its name and resource URL.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Derives the item's identifier from its resource URL.
    pub fn id(&self) -> Result<ItemId> {
        ItemId::from_url(&self.url)
    }
}

/// A single fetched page of list items.
///
/// Pages are produced once per successful list fetch and are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Items in API order.
    pub items: Vec<ListItem>,
    /// Whether the API advertised a continuation (`next != null`).
    pub has_next: bool,
    /// Zero-based page position.
    pub page_index: usize,
}

/// A named base stat of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Stat name, e.g. `hp`.
    pub name: String,
    /// Base value.
    pub value: u32,
}

/// Full detail record, created lazily on first detail fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Identifier of the item.
    pub id: ItemId,
    /// Display name, empty when the payload omitted it.
    #[serde(default)]
    pub name: String,
    /// Type tags in slot order, without duplicates.
    pub types: Vec<String>,
    /// Base stats in payload order.
    pub stats: Vec<Stat>,
    /// Move names in payload order.
    pub moves: Vec<String>,
    /// Height in decimeters, as delivered.
    pub height_decimeters: u32,
    /// Weight in hectograms, as delivered.
    pub weight_hectograms: u32,
}

impl DetailRecord {
    /// Height in meters.
    #[must_use]
    pub fn height_meters(&self) -> f64 {
        f64::from(self.height_decimeters) / 10.0
    }

    /// Weight in kilograms.
    #[must_use]
    pub fn weight_kilograms(&self) -> f64 {
        f64::from(self.weight_hectograms) / 10.0
    }
}

/// A favorited item. Favorites have set semantics keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Set key.
    pub id: ItemId,
    /// Name at the time it was favorited.
    pub name: String,
    /// Resource URL.
    pub url: String,
}

impl FavoriteEntry {
    /// Builds a favorite from a list item, deriving its identifier.
    pub fn from_item(item: &ListItem) -> Result<Self> {
        Ok(Self {
            id: item.id()?,
            name: item.name.clone(),
            url: item.url.clone(),
        })
    }
}

/// Body of `GET <base>/pokemon?limit=..&offset=..`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    /// Total number of items, when reported.
    #[serde(default)]
    pub count: Option<u64>,
    /// Items on this page.
    pub results: Vec<ListItem>,
    /// URL of the next page, `None` on the last one.
    #[serde(default)]
    pub next: Option<String>,
}

impl ListResponse {
    /// Converts the response into the page at `page_index`.
    #[must_use]
    pub fn into_page(self, page_index: usize) -> Page {
        Page {
            has_next: self.next.is_some(),
            items: self.results,
            page_index,
        }
    }
}

/// `{ "name": ... }` reference used throughout the detail payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    /// Referenced resource name.
    pub name: String,
}

/// One type slot of a detail payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    /// The referenced type.
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

/// One stat entry of a detail payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    /// The referenced stat.
    pub stat: NamedRef,
    /// Base value.
    pub base_stat: u32,
}

/// One move entry of a detail payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveEntry {
    /// The referenced move.
    #[serde(rename = "move")]
    pub kind: NamedRef,
}

/// Body of `GET <resourceUrl>`. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    /// Numeric id, if present.
    #[serde(default)]
    pub id: Option<u32>,
    /// Item name.
    #[serde(default)]
    pub name: Option<String>,
    /// Type slots.
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    /// Base stats.
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    /// Learnable moves.
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
    /// Height in decimeters.
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms.
    #[serde(default)]
    pub weight: u32,
}

impl DetailResponse {
    /// Converts the payload into a detail record for `id`.
    #[must_use]
    pub fn into_record(self, id: ItemId) -> DetailRecord {
        let mut types: Vec<String> = Vec::with_capacity(self.types.len());
        for slot in self.types {
            if !types.contains(&slot.kind.name) {
                types.push(slot.kind.name);
            }
        }

        DetailRecord {
            id,
            name: self.name.unwrap_or_default(),
            types,
            stats: self
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
            moves: self.moves.into_iter().map(|m| m.kind.name).collect(),
            height_decimeters: self.height,
            weight_hectograms: self.weight,
        }
    }
}
