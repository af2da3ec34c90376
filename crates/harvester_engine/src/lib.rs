//! Harvester engine: TMDB discovery and detail pipeline with per-year
//! checkpointing.
mod discover;
mod fetch;
mod harvest;
mod resolve;
mod sink;
mod types;

pub use discover::{discover_year, WalkSettings};
pub use fetch::{ApiFetcher, FetchSettings, TmdbFetcher};
pub use harvest::{run_harvest, HarvestConfig, HarvestSummary};
pub use resolve::resolve_details;
pub use sink::{ensure_output_dir, CsvCheckpointSink, PersistError, RecordSink};
pub use types::{CatalogEntry, DetailRecord, FailureKind, FetchError, MovieId};
