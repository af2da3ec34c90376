use std::ops::RangeInclusive;
use std::time::Duration;

use engine_logging::{engine_error, engine_info};

use crate::discover::{discover_year, WalkSettings};
use crate::fetch::ApiFetcher;
use crate::resolve::resolve_details;
use crate::sink::RecordSink;
use crate::DetailRecord;

/// Run-level configuration, fixed at startup. Constructed by the caller and
/// handed in by reference; there is no ambient process-level state.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Inclusive range of release years to walk.
    pub years: RangeInclusive<u16>,
    pub walk: WalkSettings,
    /// Self-imposed delay after each detail resolution attempt, layered on
    /// top of the walker's own pacing.
    pub entry_delay: Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            years: 2000..=2024,
            walk: WalkSettings::default(),
            entry_delay: Duration::from_millis(300),
        }
    }
}

/// Counters reported once the run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarvestSummary {
    pub years_processed: u32,
    pub records: usize,
    pub checkpoints_written: u32,
    pub checkpoint_failures: u32,
}

/// Drives the whole run: for each year, walk the discovery pages, resolve
/// every discovered entry, then checkpoint the full accumulated record set.
///
/// Nothing here is fatal. A year with zero discoveries, a failed resolution,
/// or a failed checkpoint only shrinks the eventual dataset; the loop always
/// advances to the next entry or year. Checkpoints are cumulative snapshots,
/// so the next successful persist supersedes any failed one.
pub async fn run_harvest(
    fetcher: &dyn ApiFetcher,
    sink: &dyn RecordSink,
    config: &HarvestConfig,
) -> HarvestSummary {
    let mut accumulated: Vec<DetailRecord> = Vec::new();
    let mut summary = HarvestSummary::default();

    for year in config.years.clone() {
        engine_info!("==== year {year} ====");
        let entries = discover_year(fetcher, year, &config.walk).await;
        engine_info!("year {year}: discovered {} entries", entries.len());

        for entry in &entries {
            engine_info!("resolving movie {}", entry.id);
            if let Some(record) = resolve_details(fetcher, entry.id).await {
                accumulated.push(record);
            }
            tokio::time::sleep(config.entry_delay).await;
        }

        match sink.persist(&accumulated) {
            Ok(path) => {
                summary.checkpoints_written += 1;
                engine_info!(
                    "checkpoint after year {year}: {} records at {}",
                    accumulated.len(),
                    path.display()
                );
            }
            Err(err) => {
                summary.checkpoint_failures += 1;
                engine_error!("checkpoint after year {year} failed: {err}");
            }
        }
        summary.years_processed += 1;
    }

    summary.records = accumulated.len();
    summary
}
