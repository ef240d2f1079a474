//! Output formatting for text and JSON.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use dex_core::{DetailRecord, FavoriteEntry, FavoritesManager, ItemId, ListItem};
use serde::Serialize;

/// Number of moves shown in the detail view.
pub const SHOWN_MOVES: usize = 8;

/// Output format for commands that print data
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty text output (default)
    Text,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// One line of a rendered list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    /// `None` when the URL carries no identifier.
    pub id: Option<ItemId>,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    pub favorite: bool,
}

impl ListRow {
    pub fn new(item: &ListItem, favorites: &FavoritesManager) -> Self {
        let id = item.id().ok();
        Self {
            id,
            name: item.name.clone(),
            url: item.url.clone(),
            sprite: id.map(ItemId::sprite_url),
            favorite: id.is_some_and(|id| favorites.is_favorite(id)),
        }
    }

    pub fn from_favorite(entry: &FavoriteEntry) -> Self {
        Self {
            id: Some(entry.id),
            name: entry.name.clone(),
            url: entry.url.clone(),
            sprite: Some(entry.id.sprite_url()),
            favorite: true,
        }
    }
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_rows(rows: &[ListRow]) {
    for row in rows {
        let id = row.id.map_or_else(|| "#???".to_string(), ItemId::padded);
        let star = if row.favorite {
            format!(" {}", "★".yellow())
        } else {
            String::new()
        };
        println!("{}  {}{}", format!("{id:>6}").dimmed(), row.name, star);
    }
}

fn label(name: &str) -> ColoredString {
    format!("{name:<7}").cyan()
}

pub fn print_detail(record: &DetailRecord, favorite: bool) {
    let star = if favorite {
        format!(" {}", "★".yellow())
    } else {
        String::new()
    };
    println!(
        "{} {}{}",
        record.id.padded().dimmed(),
        record.name.bold(),
        star
    );
    println!("  {} {}", label("types"), record.types.join(", "));
    println!("  {} {:.1} m", label("height"), record.height_meters());
    println!("  {} {:.1} kg", label("weight"), record.weight_kilograms());

    if !record.stats.is_empty() {
        println!("  {}", "stats".cyan());
        for stat in &record.stats {
            println!("    {:<16} {:>3}", stat.name, stat.value);
        }
    }

    if !record.moves.is_empty() {
        let shown: Vec<&str> = record
            .moves
            .iter()
            .take(SHOWN_MOVES)
            .map(String::as_str)
            .collect();
        let more = record.moves.len().saturating_sub(SHOWN_MOVES);
        let suffix = if more > 0 {
            format!(" (+{more} more)")
        } else {
            String::new()
        };
        println!("  {} {}{}", label("moves"), shown.join(", "), suffix.dimmed());
    }
}
