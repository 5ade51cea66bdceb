//! Engine error types.

use crate::fetch::{FeedKind, FetchError};

/// Failure of a reconciliation pass.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A feed could not be fetched; the whole pass is abandoned
    #[error("failed to fetch {kind} for station {station_id}: {source}")]
    Fetch {
        station_id: String,
        kind: FeedKind,
        #[source]
        source: FetchError,
    },
}

impl EngineError {
    /// Station whose feed failed.
    pub fn station_id(&self) -> &str {
        match self {
            EngineError::Fetch { station_id, .. } => station_id,
        }
    }

    /// Which feed failed.
    pub fn kind(&self) -> FeedKind {
        match self {
            EngineError::Fetch { kind, .. } => *kind,
        }
    }
}
