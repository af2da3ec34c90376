//! `tmdb-harvest` — batch TMDB movie metadata harvester.
//!
//! Walks a range of release years against the discovery endpoint, resolves
//! full details (credits included) for every discovered movie, and
//! checkpoints the accumulated dataset to a CSV file after each year.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use harvester_engine::{
    run_harvest, CsvCheckpointSink, FetchSettings, HarvestConfig, TmdbFetcher, WalkSettings,
};

#[derive(Parser)]
#[command(name = "tmdb-harvest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Harvest TMDB movie metadata into a CSV dataset", long_about = None)]
struct Cli {
    /// TMDB API key (v3 auth)
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: String,

    /// First release year to harvest (inclusive)
    #[arg(long, default_value_t = 2000)]
    first_year: u16,

    /// Last release year to harvest (inclusive)
    #[arg(long, default_value_t = 2024)]
    last_year: u16,

    /// Maximum discovery pages requested per year
    #[arg(long, default_value_t = 20)]
    max_pages: u32,

    /// Output CSV path, overwritten wholesale on every checkpoint
    #[arg(short, long, default_value = "tmdb_movies_full.csv")]
    output: PathBuf,

    /// Enable verbose output (per-attempt fetch diagnostics)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    engine_logging::initialize(cli.verbose);

    if cli.first_year > cli.last_year {
        bail!("--first-year must not exceed --last-year");
    }

    let fetcher = TmdbFetcher::new(FetchSettings {
        api_key: cli.api_key.clone(),
        ..FetchSettings::default()
    })
    .context("building HTTP client")?;

    let sink = CsvCheckpointSink::new(cli.output.clone());
    let config = HarvestConfig {
        years: cli.first_year..=cli.last_year,
        walk: WalkSettings {
            page_ceiling: cli.max_pages,
            ..WalkSettings::default()
        },
        ..HarvestConfig::default()
    };

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let summary = runtime.block_on(run_harvest(&fetcher, &sink, &config));

    println!("======= harvest complete =======");
    println!("years processed:   {}", summary.years_processed);
    println!("records collected: {}", summary.records);
    println!(
        "checkpoints:       {} written, {} failed",
        summary.checkpoints_written, summary.checkpoint_failures
    );
    println!("output:            {}", cli.output.display());
    Ok(())
}
