//! Feed fetching seam.
//!
//! The engine asks for raw payloads by station and feed kind and does not
//! care how they are transported. [`HttpFeedFetcher`] talks to the real
//! services; [`StaticFeedFetcher`] serves canned payloads for tests and
//! offline runs.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::Path;

use tracing::debug;

use crate::domain::HourWindow;
use crate::efa::{EfaClient, EfaError};
use crate::iris::{IrisClient, IrisError};

/// Which payload to fetch for a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    /// Planned timetable for one clock hour.
    PlannedWindow(HourWindow),
    /// Pending realtime changes.
    Changes,
    /// JSON realtime stop events.
    RealtimeStopEvents,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::PlannedWindow(window) => write!(f, "planned window {window}"),
            FeedKind::Changes => f.write_str("change feed"),
            FeedKind::RealtimeStopEvents => f.write_str("realtime stop events"),
        }
    }
}

/// Errors surfaced by a feed fetcher.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Iris(#[from] IrisError),

    #[error(transparent)]
    Efa(#[from] EfaError),

    /// No client is configured for this kind of feed
    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    /// No canned payload for this station and kind
    #[error("no payload for station {station_id} ({kind})")]
    Missing { station_id: String, kind: FeedKind },

    /// Reading canned payloads failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of raw feed payloads.
pub trait FeedFetcher {
    fn fetch(
        &self,
        station_id: &str,
        kind: FeedKind,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetcher backed by the live HTTP services.
#[derive(Debug, Clone, Default)]
pub struct HttpFeedFetcher {
    iris: Option<IrisClient>,
    efa: Option<EfaClient>,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this client for planned windows and changes.
    pub fn with_iris(mut self, client: IrisClient) -> Self {
        self.iris = Some(client);
        self
    }

    /// Use this client for realtime stop events.
    pub fn with_efa(mut self, client: EfaClient) -> Self {
        self.efa = Some(client);
        self
    }
}

impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, station_id: &str, kind: FeedKind) -> Result<String, FetchError> {
        match kind {
            FeedKind::PlannedWindow(window) => {
                let client = self
                    .iris
                    .as_ref()
                    .ok_or(FetchError::NotConfigured("timetable API"))?;
                Ok(client.get_plan(station_id, &window).await?)
            }
            FeedKind::Changes => {
                let client = self
                    .iris
                    .as_ref()
                    .ok_or(FetchError::NotConfigured("timetable API"))?;
                Ok(client.get_changes(station_id).await?)
            }
            FeedKind::RealtimeStopEvents => {
                let client = self
                    .efa
                    .as_ref()
                    .ok_or(FetchError::NotConfigured("EFA API"))?;
                Ok(client.get_stop_events(station_id).await?)
            }
        }
    }
}

/// Fetcher serving payloads from memory.
///
/// Planned windows are looked up by their exact window; a missing window is
/// an error, as it would be upstream.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedFetcher {
    payloads: HashMap<(String, FeedKind), String>,
}

impl StaticFeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload.
    pub fn insert(
        &mut self,
        station_id: impl Into<String>,
        kind: FeedKind,
        payload: impl Into<String>,
    ) {
        self.payloads.insert((station_id.into(), kind), payload.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(
        mut self,
        station_id: impl Into<String>,
        kind: FeedKind,
        payload: impl Into<String>,
    ) -> Self {
        self.insert(station_id, kind, payload);
        self
    }

    /// Register a payload read from a file.
    pub fn insert_file(
        &mut self,
        station_id: impl Into<String>,
        kind: FeedKind,
        path: impl AsRef<Path>,
    ) -> Result<(), FetchError> {
        let payload = std::fs::read_to_string(path)?;
        self.insert(station_id, kind, payload);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl FeedFetcher for StaticFeedFetcher {
    async fn fetch(&self, station_id: &str, kind: FeedKind) -> Result<String, FetchError> {
        debug!(station_id, %kind, "serving canned payload");
        self.payloads
            .get(&(station_id.to_string(), kind))
            .cloned()
            .ok_or_else(|| FetchError::Missing {
                station_id: station_id.to_string(),
                kind,
            })
    }
}
