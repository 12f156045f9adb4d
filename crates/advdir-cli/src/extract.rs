//! `extract` and `links` command handlers.
//!
//! Both build one `PageClient` from the environment settings and run
//! strictly sequentially. Only a seed page failure aborts a run; per-page
//! failures show up in the summary.

use std::path::PathBuf;

use anyhow::Context;

use advdir_core::{HttpSettings, RunConfig};
use advdir_scraper::{discover_links, run_extraction, PageClient, ProgressEvent, RunStats};

use crate::{export, workbook};

/// Profiles between two `info`-level progress lines.
const PROGRESS_EVERY: usize = 25;

fn build_client(settings: &HttpSettings, config: &RunConfig) -> anyhow::Result<PageClient> {
    PageClient::new(settings, config.delay).context("failed to build HTTP client")
}

fn log_progress(event: &ProgressEvent<'_>) {
    match event {
        ProgressEvent::SeedLoaded { url, links } => {
            tracing::info!(url, links, "seed page loaded");
        }
        ProgressEvent::CrawlFinished {
            pages,
            errors,
            links,
        } => {
            tracing::info!(pages, errors, links, "deep crawl finished");
        }
        ProgressEvent::ProfileDone {
            url,
            index,
            total,
            stats,
        } => {
            if index % PROGRESS_EVERY == 0 || index == total {
                tracing::info!(
                    processed = index,
                    total,
                    kept = stats.kept,
                    errors = stats.errors,
                    "profile progress"
                );
            } else {
                tracing::debug!(url, processed = index, total, "profile done");
            }
        }
    }
}

fn print_summary(stats: &RunStats, records: usize) {
    eprintln!("Profile links:  {}", stats.links_found);
    if stats.crawl_pages > 0 {
        eprintln!("Crawled pages:  {}", stats.crawl_pages);
    }
    eprintln!("Processed:      {}", stats.processed);
    eprintln!("Kept:           {}", stats.kept);
    eprintln!("After dedupe:   {records}");
    eprintln!("Errors:         {}", stats.errors);
}

/// Runs a full extraction and writes the CSV.
///
/// `output` defaults to [`RunConfig::default_output_file`]. With `xlsx` a
/// styled workbook is written next to the CSV; failing to write it only
/// logs a warning. No file is written when the run finds no links or keeps
/// no records.
///
/// # Errors
///
/// Returns an error for invalid run parameters, a seed page failure, or a
/// CSV write failure.
pub(crate) async fn run_extract(
    settings: &HttpSettings,
    config: &RunConfig,
    output: Option<PathBuf>,
    xlsx: bool,
) -> anyhow::Result<()> {
    config.validate().context("invalid run parameters")?;
    let client = build_client(settings, config)?;

    let report = run_extraction(&client, config, log_progress)
        .await
        .context("extraction failed")?;
    print_summary(&report.stats, report.records.len());

    if report.stats.links_found == 0 {
        tracing::warn!("no advisor profile links found; try --deep-crawl");
        return Ok(());
    }
    if report.records.is_empty() {
        tracing::warn!("no advisors matched the filters; try --all-provinces or drop --city");
        return Ok(());
    }

    let output = output.unwrap_or_else(|| PathBuf::from(config.default_output_file()));
    export::write_csv(&output, &report.records, config.columns)
        .with_context(|| format!("failed to write CSV to {}", output.display()))?;
    if !export::is_stdout(&output) {
        tracing::info!(
            path = %output.display(),
            records = report.records.len(),
            "CSV written"
        );
    }

    if xlsx {
        let path = workbook::workbook_path(&output, config);
        match workbook::write_xlsx(&path, &report.records, config.columns) {
            Ok(()) => tracing::info!(path = %path.display(), "Excel workbook written"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to write Excel workbook; CSV output is unaffected"
            ),
        }
    }
    Ok(())
}

/// Prints discovered profile URLs to stdout, sorted, one per line.
///
/// # Errors
///
/// Returns an error for invalid run parameters or a seed page failure.
pub(crate) async fn run_links(settings: &HttpSettings, config: &RunConfig) -> anyhow::Result<()> {
    config.validate().context("invalid run parameters")?;
    let client = build_client(settings, config)?;

    let discovery = discover_links(&client, config)
        .await
        .context("link discovery failed")?;

    if discovery.links.is_empty() {
        tracing::warn!(url = %discovery.seed_url, "no advisor profile links found");
    }
    for link in &discovery.links {
        println!("{link}");
    }
    tracing::info!(
        links = discovery.links.len(),
        crawl_pages = discovery.crawl_pages,
        errors = discovery.crawl_errors,
        "link discovery complete"
    );
    Ok(())
}
