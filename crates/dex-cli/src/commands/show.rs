//! `dex show`

use anyhow::Result;
use colored::Colorize;
use dex_core::{DetailLoader, DetailPanel, FavoritesManager, ListItem};
use serde::Serialize;

use super::Session;
use crate::error::CliError;
use crate::output::{OutputFormat, print_detail, print_json};

#[derive(Serialize)]
struct ShowReport {
    #[serde(flatten)]
    panel: DetailPanel,
    #[serde(skip_serializing_if = "Option::is_none")]
    artwork: Option<String>,
}

/// Opens the detail view for one item.
///
/// Detail loading is fail-soft: when the record cannot be fetched the panel
/// stays empty and the command still succeeds.
pub async fn show(session: &Session, key: &str, output: OutputFormat) -> Result<()> {
    let url = session.fetcher.item_url(key).map_err(CliError::from)?;
    let item = ListItem::new(key.trim(), url);

    let loader = DetailLoader::new(session.api(), session.cache.clone());
    let panel = loader.open(&item).await;

    match output {
        OutputFormat::Json => {
            let artwork = panel.record.as_ref().map(|record| record.id.artwork_url());
            print_json(&ShowReport { panel, artwork })?;
        },
        OutputFormat::Text => match &panel.record {
            Some(record) => {
                let favorites = FavoritesManager::load(session.cache.clone());
                print_detail(record, favorites.is_favorite(record.id));
            },
            None => println!("{}", format!("Details unavailable for '{}'", item.name).dimmed()),
        },
    }
    Ok(())
}
