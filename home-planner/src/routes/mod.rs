//! Tracked routes and their travel times.
//!
//! Route storage belongs to the surrounding application. The engine reads
//! routes through [`TrackedRouteSource`], already paired with their
//! travel-time profiles and in board order.

mod file;

use std::future::Future;

use crate::domain::{TrackedRoute, TravelTimeProfile};

pub use file::{JsonRouteSource, RouteFile};

/// A tracked route together with its travel-time estimates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRouteEntry {
    pub route: TrackedRoute,
    pub profile: TravelTimeProfile,
}

impl TrackedRouteEntry {
    pub fn new(route: TrackedRoute, profile: TravelTimeProfile) -> Self {
        Self { route, profile }
    }
}

/// Errors loading tracked routes.
#[derive(Debug, thiserror::Error)]
pub enum RouteSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid route file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate route id: {0}")]
    DuplicateRoute(String),
}

/// Supplier of the routes to reconcile.
pub trait TrackedRouteSource {
    /// All tracked routes, ordered by station name, line, destination and
    /// origin.
    fn load(&self) -> impl Future<Output = Result<Vec<TrackedRouteEntry>, RouteSourceError>> + Send;
}

/// Sort entries into board order.
///
/// Routes without a station name sort first. Comparison ignores case.
pub fn sort_entries(entries: &mut [TrackedRouteEntry]) {
    entries.sort_by_cached_key(|entry| {
        let route = &entry.route;
        (
            route.station_name.as_deref().unwrap_or_default().to_lowercase(),
            route.line.to_lowercase(),
            route.key.destination().to_lowercase(),
            route.key.origin().unwrap_or_default().to_lowercase(),
        )
    });
}
