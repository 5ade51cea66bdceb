//! Response types at the engine boundary.
//!
//! Field names are camelCase; the departure board consumes these as-is.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DepartureRecommendation, HourWindow};
use crate::engine::RouteCandidate;

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeparturesResponse {
    /// When the pass ran (RFC 3339, UTC)
    pub generated_at: String,

    /// Number of departure records
    pub count: usize,

    /// Records in route order
    pub departures: Vec<DepartureRecommendation>,
}

impl DeparturesResponse {
    pub fn new(generated_at: DateTime<Utc>, departures: Vec<DepartureRecommendation>) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            count: departures.len(),
            departures,
        }
    }
}

/// Routes that can be tracked from a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDiscoveryResponse {
    /// Station the routes were discovered at
    pub eva_id: String,

    /// Local date of the window searched
    pub date: NaiveDate,

    /// Local hour of the window searched
    pub hour: u32,

    pub count: usize,

    pub routes: Vec<RouteCandidate>,
}

impl RouteDiscoveryResponse {
    pub fn new(station_id: impl Into<String>, window: HourWindow, routes: Vec<RouteCandidate>) -> Self {
        Self {
            eva_id: station_id.into(),
            date: window.date(),
            hour: window.hour(),
            count: routes.len(),
            routes,
        }
    }
}
