use engine_logging::{engine_debug, engine_warn};
use serde::Deserialize;

use crate::fetch::ApiFetcher;
use crate::{DetailRecord, MovieId};

const DIRECTOR_JOB: &str = "Director";
const UNKNOWN_DIRECTOR: &str = "Unknown";
const TOP_CAST_LEN: usize = 3;
const LIST_SEPARATOR: &str = ", ";

/// Expected shape of the detail endpoint payload. Every field is optional so
/// a sparse payload degrades to defaults instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
struct MovieDetails {
    title: Option<String>,
    release_date: Option<String>,
    budget: Option<u64>,
    revenue: Option<u64>,
    runtime: Option<u32>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    production_companies: Vec<Named>,
    credits: Option<Credits>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: Option<String>,
    job: Option<String>,
}

/// Fetches the detail payload for one catalog entry, credits included, and
/// projects it into the output record shape.
///
/// Returns `None` when the API gave us nothing usable; the caller skips the
/// entry and continues — a handful of missing details never aborts a run.
pub async fn resolve_details(fetcher: &dyn ApiFetcher, id: MovieId) -> Option<DetailRecord> {
    let query = [("append_to_response", "credits".to_string())];
    let body = match fetcher.get_json(&format!("/movie/{id}"), &query).await {
        Ok(body) => body,
        Err(err) => {
            engine_debug!("details for movie {id} unavailable: {err}");
            return None;
        }
    };

    let details: MovieDetails = match serde_json::from_value(body) {
        Ok(details) => details,
        Err(err) => {
            engine_warn!("detail payload for movie {id} had an unexpected shape: {err}");
            return None;
        }
    };

    Some(project(id, details))
}

fn project(id: MovieId, details: MovieDetails) -> DetailRecord {
    let credits = details.credits.unwrap_or_default();
    DetailRecord {
        tmdb_id: id,
        title: details.title,
        release_date: details.release_date,
        // Zero means "not reported" upstream; surface it as missing so
        // downstream consumers never mistake the sentinel for a real figure.
        budget: nonzero(details.budget),
        revenue: nonzero(details.revenue),
        runtime: details.runtime,
        vote_average: details.vote_average,
        vote_count: details.vote_count,
        genres: join_names(&details.genres),
        production_companies: join_names(&details.production_companies),
        director: director_name(&credits.crew),
        top_cast: top_cast_names(&credits.cast),
    }
}

fn nonzero(value: Option<u64>) -> Option<u64> {
    value.filter(|v| *v != 0)
}

/// First crew member credited as director, in crew-list order. First match
/// wins; co-directors beyond the first are not represented.
fn director_name(crew: &[CrewMember]) -> String {
    crew.iter()
        .find(|member| member.job.as_deref() == Some(DIRECTOR_JOB))
        .and_then(|member| member.name.clone())
        .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string())
}

/// First three cast names in billing order; fewer yields fewer.
fn top_cast_names(cast: &[CastMember]) -> String {
    cast.iter()
        .take(TOP_CAST_LEN)
        .filter_map(|member| member.name.as_deref())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn join_names(items: &[Named]) -> String {
    items
        .iter()
        .filter_map(|item| item.name.as_deref())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crew(member_pairs: &[(&str, &str)]) -> Vec<CrewMember> {
        member_pairs
            .iter()
            .map(|(name, job)| CrewMember {
                name: Some((*name).to_string()),
                job: Some((*job).to_string()),
            })
            .collect()
    }

    fn cast(names: &[&str]) -> Vec<CastMember> {
        names
            .iter()
            .map(|name| CastMember {
                name: Some((*name).to_string()),
            })
            .collect()
    }

    #[test]
    fn director_defaults_to_unknown_without_crew() {
        assert_eq!(director_name(&[]), "Unknown");
        assert_eq!(director_name(&crew(&[("Ava", "Editor")])), "Unknown");
    }

    #[test]
    fn director_is_first_match_in_crew_order() {
        let members = crew(&[("Ava", "Editor"), ("Ben", "Director"), ("Cy", "Director")]);
        assert_eq!(director_name(&members), "Ben");
    }

    #[test]
    fn director_without_name_falls_back_to_unknown() {
        let members = vec![CrewMember {
            name: None,
            job: Some("Director".to_string()),
        }];
        assert_eq!(director_name(&members), "Unknown");
    }

    #[test]
    fn top_cast_is_capped_at_three_in_billing_order() {
        assert_eq!(top_cast_names(&cast(&[])), "");
        assert_eq!(top_cast_names(&cast(&["A"])), "A");
        assert_eq!(top_cast_names(&cast(&["A", "B"])), "A, B");
        assert_eq!(top_cast_names(&cast(&["A", "B", "C"])), "A, B, C");
        assert_eq!(top_cast_names(&cast(&["A", "B", "C", "D", "E"])), "A, B, C");
    }

    #[test]
    fn name_lists_join_in_api_order_without_dedup() {
        let items = vec![
            Named {
                name: Some("Drama".to_string()),
            },
            Named {
                name: Some("Action".to_string()),
            },
            Named {
                name: Some("Drama".to_string()),
            },
        ];
        assert_eq!(join_names(&items), "Drama, Action, Drama");
    }

    #[test]
    fn zero_budget_and_revenue_become_missing() {
        let record = project(
            7,
            MovieDetails {
                budget: Some(0),
                revenue: Some(0),
                ..MovieDetails::default()
            },
        );
        assert_eq!(record.budget, None);
        assert_eq!(record.revenue, None);
        assert_eq!(record.director, "Unknown");
        assert_eq!(record.top_cast, "");
    }
}
