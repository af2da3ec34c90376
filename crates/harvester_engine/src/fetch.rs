use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use serde_json::Value;

use crate::{FailureKind, FetchError};

/// Connection parameters for the catalog API.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    /// v3 API key, injected into the query of every request.
    pub api_key: String,
    pub request_timeout: Duration,
    /// Fixed cooldown between attempts. No exponential backoff; this is a
    /// low-stakes batch job.
    pub retry_cooldown: Duration,
    pub max_attempts: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(10),
            retry_cooldown: Duration::from_secs(1),
            max_attempts: 3,
        }
    }
}

/// A single JSON GET against the API, retries included.
#[async_trait::async_trait]
pub trait ApiFetcher: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct TmdbFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl TmdbFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(0, FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Url, FetchError> {
        let mut url = reqwest::Url::parse(&format!("{}{}", self.settings.base_url, path))
            .map_err(|err| FetchError::new(0, FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.settings.api_key);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn attempt(&self, url: &reqwest::Url) -> Result<Value, (FailureKind, String)> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err((FailureKind::HttpStatus(status.as_u16()), status.to_string()));
        }

        response.json::<Value>().await.map_err(|err| {
            if err.is_decode() {
                (FailureKind::Decode, err.to_string())
            } else {
                map_reqwest_error(err)
            }
        })
    }
}

#[async_trait::async_trait]
impl ApiFetcher for TmdbFetcher {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = self.build_url(path, query)?;

        let max_attempts = self.settings.max_attempts;
        let mut last = (FailureKind::Network, String::from("no attempt made"));
        for attempt in 1..=max_attempts {
            match self.attempt(&url).await {
                Ok(body) => return Ok(body),
                Err((kind, message)) => {
                    engine_debug!("attempt {attempt}/{max_attempts} for {path} failed: {kind}");
                    last = (kind, message);
                }
            }
            if attempt < max_attempts {
                tokio::time::sleep(self.settings.retry_cooldown).await;
            }
        }

        let (kind, message) = last;
        engine_warn!("{path} unavailable after {max_attempts} attempt(s): {kind}");
        Err(FetchError::new(max_attempts, kind, message))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> (FailureKind, String) {
    if err.is_timeout() {
        return (FailureKind::Timeout, err.to_string());
    }
    (FailureKind::Network, err.to_string())
}
