//! EFA departure monitor DTOs.
//!
//! These map the `rapidJSON` stop-event response. Every field is optional:
//! the service omits fields freely, and a single odd record must not spoil
//! the rest of the board.

use serde::Deserialize;

/// Top-level departure monitor response.
///
/// Locations and stop events are kept as raw values so each one can be
/// decoded (and rejected) on its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfaDepartureMonitor {
    #[serde(default)]
    pub locations: Vec<serde_json::Value>,
    #[serde(default)]
    pub stop_events: Vec<serde_json::Value>,
}

/// A single departure at the requested stop.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfaStopEvent {
    pub location: Option<EfaLocation>,
    pub departure_time_planned: Option<String>,
    pub departure_time_estimated: Option<String>,
    pub transportation: Option<EfaTransportation>,
    /// Realtime flags, e.g. `MONITORED` or `TRIP_CANCELLED`.
    #[serde(default)]
    pub realtime_status: Vec<String>,
}

/// The platform (or stop point) the event departs from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfaLocation {
    pub name: Option<String>,
    pub disassembled_name: Option<String>,
    pub properties: Option<EfaLocationProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfaLocationProperties {
    /// Raw platform code, e.g. "2".
    pub platform: Option<String>,
    /// Human platform name, e.g. "Gleis 2".
    pub platform_name: Option<String>,
}

/// Vehicle and trip information.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfaTransportation {
    /// Long line name, e.g. "S-Bahn S4".
    pub name: Option<String>,
    /// Short line name, e.g. "S4".
    pub disassembled_name: Option<String>,
    pub number: Option<String>,
    pub origin: Option<EfaPlace>,
    pub destination: Option<EfaPlace>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EfaPlace {
    pub name: Option<String>,
}
