use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base of the sprite repository that accompanies the API.
pub const SPRITE_BASE_URL: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Stable numeric identifier of a catalog item.
///
/// Identifiers are never stored alongside list items; they are derived from the
/// item's resource URL, whose last non-empty path segment is the number
/// (`https://pokeapi.co/api/v2/pokemon/25/` → `25`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Derives the identifier from a resource URL.
    ///
    /// Query strings and fragments are ignored, as are trailing slashes.
    ///
    /// ```rust
    /// use dex_core::ItemId;
    ///
    /// let id = ItemId::from_url("https://pokeapi.co/api/v2/pokemon/25/")?;
    /// assert_eq!(id.get(), 25);
    /// # Ok::<(), dex_core::Error>(())
    /// ```
    pub fn from_url(url: &str) -> Result<Self> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let segment = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .next_back()
            .ok_or_else(|| Error::InvalidUrl(format!("no path segment in '{url}'")))?;

        segment
            .parse::<u32>()
            .map(Self)
            .map_err(|_| Error::InvalidUrl(format!("cannot derive identifier from '{url}'")))
    }

    /// Zero-padded display form used in listings (`#025`).
    #[must_use]
    pub fn padded(self) -> String {
        format!("#{:03}", self.0)
    }

    /// Small front sprite, as shown next to list rows.
    #[must_use]
    pub fn sprite_url(self) -> String {
        format!("{SPRITE_BASE_URL}/{}.png", self.0)
    }

    /// Official artwork, as shown in the detail view.
    #[must_use]
    pub fn artwork_url(self) -> String {
        format!("{SPRITE_BASE_URL}/other/official-artwork/{}.png", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('#');
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }
}
