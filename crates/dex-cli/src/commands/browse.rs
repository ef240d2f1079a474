//! `dex browse`

use anyhow::Result;
use colored::Colorize;
use dex_core::{FavoritesManager, PaginationCoordinator, PrefetchReport, TypeFilter, ViewQuery, view};
use tracing::warn;
use serde::Serialize;

use super::{Session, load_pages};
use crate::cli::BrowseArgs;
use crate::output::{ListRow, OutputFormat, print_json, print_rows};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrowseReport {
    query: ViewQuery,
    pages: usize,
    loaded: usize,
    has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefetch: Option<PrefetchReport>,
    items: Vec<ListRow>,
}

/// Loads the requested pages and prints the projected view.
///
/// Type tags are prefetched when asked for, and whenever a type filter is set so
/// the filter has data to work with.
pub async fn browse(session: &Session, args: BrowseArgs) -> Result<()> {
    if let TypeFilter::Only(name) = &args.type_filter {
        if !TypeFilter::is_known(name) {
            warn!(
                "type '{name}' is not in the type menu ({}); filtering anyway",
                view::KNOWN_TYPES.join(", ")
            );
        }
    }

    let pages = PaginationCoordinator::new(session.api());
    let target = if args.all {
        usize::MAX
    } else {
        usize::try_from(args.pages).unwrap_or(usize::MAX)
    };
    load_pages(&pages, target).await?;

    let items = pages.items();
    let prefetch = if args.prefetch || args.type_filter != TypeFilter::All {
        session.prefetcher().run(&items).await
    } else {
        None
    };

    let query = ViewQuery::search(args.query)
        .with_filter(args.type_filter)
        .with_sort(args.sort);
    let visible = view::project(&items, &query, &session.cache);

    let favorites = FavoritesManager::load(session.cache.clone());
    let rows: Vec<ListRow> = visible
        .iter()
        .map(|item| ListRow::new(item, &favorites))
        .collect();

    let state = pages.snapshot();
    let report = BrowseReport {
        query,
        pages: state.pages.len(),
        loaded: items.len(),
        has_more: state.has_more,
        error: state.error,
        prefetch,
        items: rows,
    };

    match args.output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &BrowseReport) {
    if let Some(error) = &report.error {
        eprintln!(
            "{} stopped after {} page(s): {error}",
            "warning:".yellow().bold(),
            report.pages
        );
    }

    if report.items.is_empty() {
        println!("No matches among {} loaded", report.loaded);
    } else {
        print_rows(&report.items);
    }

    let more = if report.has_more {
        format!(", more with --pages {}", report.pages + 1)
    } else {
        String::new()
    };
    println!(
        "{}",
        format!("{} shown, {} loaded{more}", report.items.len(), report.loaded).dimmed()
    );
}
