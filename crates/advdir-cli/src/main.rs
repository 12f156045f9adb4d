mod export;
mod extract;
mod workbook;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use advdir_core::run_config::{DEFAULT_BASE_URL, DEFAULT_CRAWL_PAGE_LIMIT, DEFAULT_SEED_PATH};
use advdir_core::{parse_delay_secs, OutputColumns, Province, RunConfig};

#[derive(Debug, Parser)]
#[command(name = "advdir")]
#[command(about = "Extract advisor contacts from the NBFWM advisor directory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every discovered profile and export matching advisors as CSV
    Extract(ExtractArgs),
    /// Print discovered profile URLs, one per line, without fetching them
    Links(DiscoveryArgs),
}

/// Where to look and how hard to look.
#[derive(Debug, Args)]
struct DiscoveryArgs {
    /// Site root; profile links on other hosts are ignored
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Directory page path, joined onto the base URL
    #[arg(long, default_value = DEFAULT_SEED_PATH)]
    seed_path: String,
    /// Politeness delay after every request, in seconds
    #[arg(long, default_value = "0.25", value_parser = parse_delay_secs)]
    delay: Duration,
    /// Also walk same-site /advisor/*.html pages for more profile links
    #[arg(long)]
    deep_crawl: bool,
    /// Maximum pages the deep crawl fetches, seed included
    #[arg(long, default_value_t = DEFAULT_CRAWL_PAGE_LIMIT)]
    crawl_page_limit: usize,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    #[command(flatten)]
    discovery: DiscoveryArgs,
    /// Keep only advisors in this province (two-letter code)
    #[arg(long, default_value = "QC")]
    province: Province,
    /// Keep advisors from every province
    #[arg(long, conflicts_with = "province")]
    all_provinces: bool,
    /// Keep only advisors whose city or address contains this text
    #[arg(long)]
    city: Option<String>,
    /// Stop after this many profiles (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_profiles: usize,
    #[arg(long)]
    include_profile_url: bool,
    #[arg(long)]
    include_address_hint: bool,
    #[arg(long)]
    include_city: bool,
    /// CSV destination; `-` writes to stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Also write a styled Excel workbook next to the CSV
    #[arg(long)]
    xlsx: bool,
}

impl DiscoveryArgs {
    fn to_run_config(&self) -> RunConfig {
        RunConfig {
            base_url: self.base_url.clone(),
            seed_path: self.seed_path.clone(),
            delay: self.delay,
            deep_crawl: self.deep_crawl,
            crawl_page_limit: self.crawl_page_limit,
            ..RunConfig::default()
        }
    }
}

impl ExtractArgs {
    fn to_run_config(&self) -> RunConfig {
        RunConfig {
            province: (!self.all_provinces).then_some(self.province),
            city_contains: self.city.clone(),
            max_profiles: self.max_profiles,
            columns: OutputColumns {
                city: self.include_city,
                address_hint: self.include_address_hint,
                profile_url: self.include_profile_url,
            },
            ..self.discovery.to_run_config()
        }
    }
}

/// Installs the fmt subscriber on stderr, so stdout stays free for CSV and
/// link output. `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = advdir_core::load_http_settings()?;
    init_tracing(&settings.log_level);

    match cli.command {
        Commands::Extract(args) => {
            let output = args.output.clone();
            extract::run_extract(&settings, &args.to_run_config(), output, args.xlsx).await
        }
        Commands::Links(args) => extract::run_links(&settings, &args.to_run_config()).await,
    }
}
