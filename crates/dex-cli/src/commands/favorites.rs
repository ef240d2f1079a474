//! `dex fav` and `dex favorites`

use anyhow::Result;
use colored::Colorize;
use dex_core::{CatalogApi, FavoritesManager, ListItem, Toggled};

use super::Session;
use crate::error::CliError;
use crate::output::{ListRow, OutputFormat, print_json, print_rows};

/// Toggles an item, resolving ids and names through the detail endpoint.
pub async fn toggle_favorite(session: &Session, key: &str) -> Result<()> {
    let url = session.fetcher.item_url(key).map_err(CliError::from)?;
    let record = session
        .fetcher
        .fetch_detail(&url)
        .await
        .map_err(CliError::from)?;

    // Store the canonical numeric URL, like list items carry
    let canonical = session
        .fetcher
        .item_url(&record.id.to_string())
        .map_err(CliError::from)?;
    let name = if record.name.is_empty() {
        key.trim().to_lowercase()
    } else {
        record.name.clone()
    };
    let item = ListItem::new(name, canonical);

    let mut favorites = FavoritesManager::load(session.cache.clone());
    let label = format!("{} ({})", item.name, record.id.padded());
    match favorites.toggle(&item).map_err(CliError::from)? {
        Toggled::Added => println!("{} Added {label} to favorites", "★".yellow()),
        Toggled::Removed => println!("Removed {label} from favorites"),
    }
    Ok(())
}

/// Prints the favorites, most recently added first.
pub fn list_favorites(session: &Session, output: OutputFormat) -> Result<()> {
    let favorites = FavoritesManager::load(session.cache.clone());
    let rows: Vec<ListRow> = favorites.list().iter().map(ListRow::from_favorite).collect();

    match output {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Text if rows.is_empty() => {
            println!("{}", "No favorites yet. Add one with `dex fav <ID|NAME>`.".dimmed());
        },
        OutputFormat::Text => print_rows(&rows),
    }
    Ok(())
}
