//! End-to-end extraction run: seed → discovery → per-profile parse →
//! filter → dedupe.
//!
//! Everything is awaited in sequence on one [`PageClient`]; nothing is
//! spawned. Progress is reported through a caller-supplied callback so the
//! CLI (or any other front end) decides how to render it.

use std::collections::BTreeSet;

use advdir_core::{AdvisorRecord, RunConfig};
use serde::Serialize;

use crate::client::PageClient;
use crate::crawl::crawl_from_seed;
use crate::dedupe::{dedupe_records, RecordFilter};
use crate::error::ScraperError;
use crate::links::extract_advisor_links;
use crate::location_index::LocationIndex;
use crate::profile::parse_profile;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Profile URLs discovered, before the `max_profiles` cap.
    pub links_found: usize,
    /// Pages fetched by the deep crawl, seed included. `0` when disabled.
    pub crawl_pages: usize,
    /// Profile URLs attempted, whether or not the fetch succeeded.
    pub processed: usize,
    /// Profiles that passed the filters, counted before deduplication.
    pub kept: usize,
    /// Failed crawl and profile fetches.
    pub errors: usize,
}

/// Final output of [`run_extraction`].
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Filtered, deduplicated records in output order.
    pub records: Vec<AdvisorRecord>,
    pub stats: RunStats,
}

/// Profile links found for a run, plus the seed page they came from.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub seed_url: String,
    pub seed_html: String,
    /// Sorted, deduplicated profile URLs. Not yet capped.
    pub links: BTreeSet<String>,
    pub crawl_pages: usize,
    pub crawl_errors: usize,
}

/// Events emitted while a run progresses.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    SeedLoaded {
        url: &'a str,
        links: usize,
    },
    CrawlFinished {
        pages: usize,
        errors: usize,
        links: usize,
    },
    /// Emitted after every profile attempt with the counters so far.
    ProfileDone {
        url: &'a str,
        index: usize,
        total: usize,
        stats: &'a RunStats,
    },
}

/// Fetches the seed page and collects profile links from it, running the
/// deep crawl first when enabled.
///
/// # Errors
///
/// Returns [`ScraperError::Config`] when `config` fails validation and
/// [`ScraperError::SeedFetch`] when the seed page cannot be loaded.
pub async fn discover_links(
    client: &PageClient,
    config: &RunConfig,
) -> Result<Discovery, ScraperError> {
    config.validate()?;
    let seed_url = config.seed_url()?;

    tracing::info!(url = %seed_url, "loading seed page");
    let seed_html = client
        .fetch_html(&seed_url)
        .await
        .map_err(|source| ScraperError::SeedFetch {
            url: seed_url.clone(),
            source: Box::new(source),
        })?;

    let mut links = extract_advisor_links(&seed_html, &config.base_url);
    tracing::info!(links = links.len(), "profile links found on seed page");

    let (crawl_pages, crawl_errors) = if config.deep_crawl {
        tracing::info!(page_limit = config.crawl_page_limit, "starting deep crawl");
        let outcome = crawl_from_seed(
            client,
            &seed_url,
            &seed_html,
            &config.base_url,
            config.crawl_page_limit,
        )
        .await;
        links.extend(outcome.advisor_urls);
        (outcome.pages_fetched, outcome.errors)
    } else {
        (0, 0)
    };

    Ok(Discovery {
        seed_url,
        seed_html,
        links,
        crawl_pages,
        crawl_errors,
    })
}

/// Runs a full extraction.
///
/// Only a seed fetch failure aborts the run; every other failure is counted
/// in [`RunStats::errors`] and the run moves on.
///
/// # Errors
///
/// See [`discover_links`].
pub async fn run_extraction<F>(
    client: &PageClient,
    config: &RunConfig,
    mut on_progress: F,
) -> Result<ExtractionReport, ScraperError>
where
    F: FnMut(&ProgressEvent<'_>),
{
    let discovery = discover_links(client, config).await?;
    on_progress(&ProgressEvent::SeedLoaded {
        url: &discovery.seed_url,
        links: discovery.links.len(),
    });
    if config.deep_crawl {
        on_progress(&ProgressEvent::CrawlFinished {
            pages: discovery.crawl_pages,
            errors: discovery.crawl_errors,
            links: discovery.links.len(),
        });
    }

    let mut stats = RunStats {
        links_found: discovery.links.len(),
        crawl_pages: discovery.crawl_pages,
        errors: discovery.crawl_errors,
        ..RunStats::default()
    };

    if discovery.links.is_empty() {
        tracing::warn!(url = %discovery.seed_url, "no advisor profile links found");
        return Ok(ExtractionReport {
            records: Vec::new(),
            stats,
        });
    }

    let index = LocationIndex::build(&discovery.seed_html, &config.base_url);
    let filter = RecordFilter::from_config(config);

    let urls: Vec<String> = if config.max_profiles > 0 {
        discovery
            .links
            .into_iter()
            .take(config.max_profiles)
            .collect()
    } else {
        discovery.links.into_iter().collect()
    };
    let total = urls.len();
    tracing::info!(
        total,
        links_found = stats.links_found,
        indexed = index.len(),
        "fetching advisor profiles"
    );

    let mut kept = Vec::new();
    for (i, url) in urls.iter().enumerate() {
        match client.fetch_html(url).await {
            Ok(html) => {
                let record = parse_profile(&html, url, &index);
                if filter.matches(&record) {
                    kept.push(record);
                    stats.kept += 1;
                } else {
                    tracing::debug!(url = %url, province = record.province_code(), "profile filtered out");
                }
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "profile fetch failed");
                stats.errors += 1;
            }
        }
        stats.processed += 1;
        on_progress(&ProgressEvent::ProfileDone {
            url,
            index: i + 1,
            total,
            stats: &stats,
        });
    }

    let records = dedupe_records(kept);
    tracing::info!(
        links_found = stats.links_found,
        processed = stats.processed,
        kept = stats.kept,
        records = records.len(),
        errors = stats.errors,
        "extraction complete"
    );

    Ok(ExtractionReport { records, stats })
}
