use std::fmt;

use serde::Deserialize;

pub type MovieId = u64;

/// Minimal discovery summary for one catalog item. Ephemeral; consumed by the
/// detail resolver as soon as its page has been walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub id: MovieId,
}

/// One fully resolved output row.
///
/// Every field except `tmdb_id` is optional upstream; absence becomes an
/// empty cell or a documented sentinel, never an error. Budget and revenue
/// of zero are treated as "not reported" and surface as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub tmdb_id: MovieId,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub runtime: Option<u32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub genres: String,
    pub production_companies: String,
    pub director: String,
    pub top_cast: String,
}

/// Definitive failure of one API call after the retry budget is spent.
///
/// `kind` and `message` describe the final attempt. Callers treat this as
/// "no data available" and move on; nothing in the pipeline escalates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub attempts: u32,
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(attempts: u32, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            attempts,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unavailable after {} attempt(s): {} ({})",
            self.attempts, self.kind, self.message
        )
    }
}

impl std::error::Error for FetchError {}

/// What went wrong on a single fetch attempt. All kinds are retried
/// identically; the distinction exists for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "undecodable body"),
        }
    }
}
