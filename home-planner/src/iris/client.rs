//! Timetable API HTTP client.
//!
//! Fetches raw planned windows and change payloads. Parsing happens
//! elsewhere; this client only deals with transport and status codes.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::HourWindow;

use super::error::IrisError;

/// Default base URL for the timetable API.
const DEFAULT_BASE_URL: &str =
    "https://apis.deutschebahn.com/db-api-marketplace/apis/timetables/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct IrisConfig {
    /// Client id header value
    pub client_id: String,
    /// API key header value
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl IrisConfig {
    /// Create a new config with the given credentials.
    pub fn new(client_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 20,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Timetable API client.
#[derive(Debug, Clone)]
pub struct IrisClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl IrisClient {
    /// Create a new client with the given configuration.
    pub fn new(config: IrisConfig) -> Result<Self, IrisError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("db-client-id"),
            header_value(&config.client_id)?,
        );
        headers.insert(
            HeaderName::from_static("db-api-key"),
            header_value(&config.api_key)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Planned timetable for one station and one clock hour.
    pub async fn get_plan(&self, station_id: &str, window: &HourWindow) -> Result<String, IrisError> {
        let url = format!(
            "{}/plan/{}/{}/{}",
            self.base_url,
            station_id,
            window.date_param(),
            window.hour_param()
        );
        self.get_text(&url).await
    }

    /// All known changes for one station.
    pub async fn get_changes(&self, station_id: &str) -> Result<String, IrisError> {
        let url = format!("{}/fchg/{}", self.base_url, station_id);
        self.get_text(&url).await
    }

    async fn get_text(&self, url: &str) -> Result<String, IrisError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| IrisError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(url, "requesting timetable");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(IrisError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(IrisError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IrisError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.text().await?)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, IrisError> {
    HeaderValue::from_str(value).map_err(|_| IrisError::Api {
        status: 0,
        message: "Invalid credential format".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = IrisConfig::new("id", "key")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.client_id, "id");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = IrisConfig::new("id", "key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 20);
    }

    #[test]
    fn client_creation() {
        let client = IrisClient::new(IrisConfig::new("id", "key"));
        assert!(client.is_ok());
    }

    #[test]
    fn invalid_credentials_rejected() {
        let client = IrisClient::new(IrisConfig::new("bad\nid", "key"));
        assert!(matches!(client, Err(IrisError::Api { status: 0, .. })));
    }
}
