//! `dex prefetch`

use anyhow::Result;
use dex_core::{PaginationCoordinator, PrefetchReport};

use super::{Session, load_pages};
use crate::output::{OutputFormat, print_json};

/// Loads enough pages to cover the prefetch window and resolves their type tags.
pub async fn prefetch(session: &Session, output: OutputFormat) -> Result<()> {
    let pages = PaginationCoordinator::new(session.api());
    load_pages(&pages, session.window_pages()).await?;

    // A fresh prefetcher has no previous window, so it always runs
    let report = session
        .prefetcher()
        .run(&pages.items())
        .await
        .unwrap_or_default();

    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &PrefetchReport) {
    println!(
        "Type tags for {} items: {} resolved, {} already cached, {} failed",
        report.considered, report.resolved, report.already_cached, report.failed
    );
    if report.skipped_invalid > 0 {
        println!("{} items without an identifier were skipped", report.skipped_invalid);
    }
}
