//! EFA departure monitor HTTP client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use super::error::EfaError;

/// Default departure monitor endpoint (VRR open service).
const DEFAULT_BASE_URL: &str = "https://openservice-test.vrr.de/static03/XML_DM_REQUEST";

/// Default number of stop events per request.
const DEFAULT_LIMIT: u32 = 40;

/// Configuration for the EFA client.
#[derive(Debug, Clone)]
pub struct EfaConfig {
    /// Departure monitor endpoint
    pub base_url: String,
    /// Maximum stop events per request
    pub limit: u32,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EfaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            max_concurrent: 4,
            timeout_secs: 20,
        }
    }
}

impl EfaConfig {
    /// Set a custom endpoint (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the number of stop events per request.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// EFA departure monitor client.
#[derive(Debug, Clone)]
pub struct EfaClient {
    http: reqwest::Client,
    base_url: String,
    limit: u32,
    semaphore: Arc<Semaphore>,
}

impl EfaClient {
    pub fn new(config: EfaConfig) -> Result<Self, EfaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            limit: config.limit,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Realtime stop events for a stop, as raw JSON.
    pub async fn get_stop_events(&self, station_id: &str) -> Result<String, EfaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| EfaError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(station_id, "requesting stop events");

        let response = self
            .http
            .get(&self.base_url)
            .query(&self.query(station_id))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EfaError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EfaError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.text().await?)
    }

    fn query(&self, station_id: &str) -> Vec<(&'static str, String)> {
        vec![
            ("mode", "direct".to_string()),
            ("name_dm", station_id.to_string()),
            ("type_dm", "stop".to_string()),
            ("depType", "stopEvents".to_string()),
            ("outputFormat", "rapidJSON".to_string()),
            ("useRealtime", "1".to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = EfaConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.limit, DEFAULT_LIMIT);
        assert_eq!(config.timeout_secs, 20);
    }

    #[test]
    fn query_parameters() {
        let client = EfaClient::new(EfaConfig::default().with_limit(10)).unwrap();
        let query = client.query("de:05913:254");
        assert!(query.contains(&("name_dm", "de:05913:254".to_string())));
        assert!(query.contains(&("outputFormat", "rapidJSON".to_string())));
        assert!(query.contains(&("limit", "10".to_string())));
    }
}
