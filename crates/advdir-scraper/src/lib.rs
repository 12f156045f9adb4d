pub mod client;
pub mod crawl;
pub mod dedupe;
pub mod error;
pub(crate) mod html;
pub mod links;
pub mod location_index;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub(crate) mod rate_limit;
pub(crate) mod urls;

pub use client::PageClient;
pub use crawl::{crawl, crawl_from_seed, CrawlOutcome};
pub use dedupe::{dedupe_records, RecordFilter};
pub use error::ScraperError;
pub use links::{extract_advisor_links, extract_internal_pages};
pub use location_index::{DirectoryLocation, LocationIndex};
pub use normalize::{normalize_phone, resolve_province, slug_to_team_name};
pub use pipeline::{
    discover_links, run_extraction, Discovery, ExtractionReport, ProgressEvent, RunStats,
};
pub use profile::{parse_profile, PHONE_SEPARATOR};
