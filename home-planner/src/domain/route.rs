//! Tracked routes and their travel-time profiles.
//!
//! Both are owned by the surrounding application; the engine only reads
//! them.

use serde::{Deserialize, Serialize};

/// How a tracked route identifies its trips.
///
/// Earlier route records stored a line and a direction; current ones store
/// line, origin and destination. Both shapes are still found in stored data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteKey {
    /// Line + origin + destination. An empty origin matches any origin.
    Endpoints {
        #[serde(default)]
        origin: String,
        destination: String,
    },
    /// Line + direction (the trip's final destination).
    Direction { direction: String },
}

impl RouteKey {
    /// Where the trip is heading.
    pub fn destination(&self) -> &str {
        match self {
            RouteKey::Endpoints { destination, .. } => destination,
            RouteKey::Direction { direction } => direction,
        }
    }

    /// Where the trip starts, if the route records it.
    pub fn origin(&self) -> Option<&str> {
        match self {
            RouteKey::Endpoints { origin, .. } if !origin.trim().is_empty() => Some(origin),
            _ => None,
        }
    }
}

/// A route the user follows from one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedRoute {
    pub id: String,
    #[serde(alias = "stationEvaId")]
    pub station_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    pub line: String,
    #[serde(flatten)]
    pub key: RouteKey,
}

/// One labeled estimate of how long it takes to reach the stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTime {
    #[serde(default)]
    pub id: Option<String>,
    pub route_id: String,
    pub label: String,
    pub minutes: u32,
}

/// Travel-time estimates for one route.
///
/// Usually holds a "fast" and a "slow" estimate. A single estimate is used
/// as both; no estimates means nothing is configured yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelTimeProfile {
    times: Vec<TravelTime>,
}

impl TravelTimeProfile {
    pub fn new(times: Vec<TravelTime>) -> Self {
        Self { times }
    }

    /// A profile with no estimates.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        !self.times.is_empty()
    }

    pub fn times(&self) -> &[TravelTime] {
        &self.times
    }

    /// Shortest estimate in minutes.
    pub fn fastest(&self) -> Option<i64> {
        self.times.iter().map(|t| i64::from(t.minutes)).min()
    }

    /// Longest estimate in minutes.
    pub fn slowest(&self) -> Option<i64> {
        self.times.iter().map(|t| i64::from(t.minutes)).max()
    }
}
