use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use serde::Deserialize;

use crate::fetch::ApiFetcher;
use crate::CatalogEntry;

/// Bounds and pacing for the per-year discovery walk.
#[derive(Debug, Clone)]
pub struct WalkSettings {
    /// Upper bound on pages requested per year.
    pub page_ceiling: u32,
    /// Self-imposed delay between successful pages, independent of any
    /// server-declared quota.
    pub page_delay: Duration,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            page_ceiling: 20,
            page_delay: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiscoverPage {
    results: Option<Vec<CatalogEntry>>,
    total_pages: Option<u32>,
}

/// Walks the discovery endpoint for one release year, page by page, and
/// returns the materialized entry list.
///
/// Sort order is descending revenue, so when the ceiling truncates a year the
/// commercially significant titles survive. A fetch failure ends the walk as
/// if the catalog were exhausted; entries collected so far are kept.
pub async fn discover_year(
    fetcher: &dyn ApiFetcher,
    year: u16,
    settings: &WalkSettings,
) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for page in 1..=settings.page_ceiling {
        engine_info!("discover year {year}, page {page}");

        let query = [
            ("primary_release_year", year.to_string()),
            ("sort_by", "revenue.desc".to_string()),
            ("page", page.to_string()),
        ];
        let body = match fetcher.get_json("/discover/movie", &query).await {
            Ok(body) => body,
            Err(err) => {
                engine_debug!("discovery for {year} ended at page {page}: {err}");
                break;
            }
        };

        let parsed: DiscoverPage = match serde_json::from_value(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                engine_warn!("discovery page {page} for {year} had an unexpected shape: {err}");
                break;
            }
        };

        let Some(results) = parsed.results else {
            break;
        };
        entries.extend(results);

        // The API declares how many pages this query actually has.
        if page >= parsed.total_pages.unwrap_or(1) {
            break;
        }

        tokio::time::sleep(settings.page_delay).await;
    }

    entries
}
