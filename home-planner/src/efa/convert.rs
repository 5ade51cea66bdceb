//! Conversion from EFA stop events to normalized events.
//!
//! Unlike the markup feeds there is no planned/change merge: each record
//! already carries both planned and estimated times.

use tracing::{debug, warn};

use crate::domain::{EventStatus, FeedTime, NormalizedEvent};

use super::types::{EfaDepartureMonitor, EfaLocation, EfaStopEvent};

/// Marker in a realtime status flag that means the trip or stop is off.
const CANCELLATION_MARKER: &str = "CANCELLED";

/// Normalized contents of one departure monitor response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopEventBoard {
    /// Name of the requested stop, from the first reported location.
    pub station_name: Option<String>,
    pub events: Vec<NormalizedEvent>,
}

/// Parse a departure monitor payload.
///
/// An unreadable payload yields an empty board. Individual records that
/// cannot be decoded, or that lack line, destination or a parseable time,
/// are dropped.
pub fn parse_departure_monitor(payload: &str) -> StopEventBoard {
    let monitor: EfaDepartureMonitor = match serde_json::from_str(payload) {
        Ok(monitor) => monitor,
        Err(e) => {
            warn!(error = %e, "unreadable stop event payload");
            return StopEventBoard::default();
        }
    };

    let station_name = monitor
        .locations
        .first()
        .and_then(|value| serde_json::from_value::<EfaLocation>(value.clone()).ok())
        .and_then(|location| {
            first_present([location.name.as_deref(), location.disassembled_name.as_deref()])
                .map(str::to_string)
        });

    let total = monitor.stop_events.len();
    let events: Vec<NormalizedEvent> = monitor
        .stop_events
        .into_iter()
        .filter_map(|value| serde_json::from_value::<EfaStopEvent>(value).ok())
        .filter_map(|event| normalize_stop_event(&event))
        .collect();

    if events.len() < total {
        debug!(total, kept = events.len(), "dropped incomplete stop events");
    }

    StopEventBoard {
        station_name,
        events,
    }
}

/// Normalize every usable stop event in a departure monitor payload.
pub fn normalize_stop_events(payload: &str) -> Vec<NormalizedEvent> {
    parse_departure_monitor(payload).events
}

/// Normalize one stop event.
pub fn normalize_stop_event(event: &EfaStopEvent) -> Option<NormalizedEvent> {
    let transportation = event.transportation.as_ref()?;

    let line = first_present([
        transportation.disassembled_name.as_deref(),
        transportation.number.as_deref(),
        transportation.name.as_deref(),
    ])?;
    let destination = transportation
        .destination
        .as_ref()
        .and_then(|d| present(d.name.as_deref()))?;
    let origin = transportation
        .origin
        .as_ref()
        .and_then(|o| present(o.name.as_deref()));

    let planned = event
        .departure_time_planned
        .as_deref()
        .and_then(FeedTime::parse);
    let estimated = event
        .departure_time_estimated
        .as_deref()
        .and_then(FeedTime::parse);
    let effective_time = estimated.or(planned)?;

    let cancelled = event
        .realtime_status
        .iter()
        .any(|flag| flag.to_ascii_uppercase().contains(CANCELLATION_MARKER));
    let status = EventStatus::derive(planned, estimated, cancelled);

    let platform = event
        .location
        .as_ref()
        .and_then(|l| l.properties.as_ref())
        .and_then(|p| {
            first_present([p.platform_name.as_deref(), p.platform.as_deref()])
        });

    NormalizedEvent::new(line, destination, origin, platform, effective_time, status)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_present<'a, const N: usize>(values: [Option<&'a str>; N]) -> Option<&'a str> {
    values.into_iter().find_map(present)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: &str = r#"{
  "version": "10.6.14.22",
  "locations": [{ "id": "de:05913:254", "name": "Dortmund, Stadtgarten", "type": "stop" }],
  "stopEvents": [
    {
      "location": {
        "id": "de:05913:254:1:2",
        "name": "Stadtgarten",
        "disassembledName": "Bstg. 2",
        "properties": { "platform": "2", "platformName": "Bstg. 2" }
      },
      "departureTimePlanned": "2024-01-15T11:30:00Z",
      "departureTimeEstimated": "2024-01-15T11:33:00Z",
      "realtimeStatus": ["MONITORED"],
      "transportation": {
        "id": "vrr:11U42: :H:j24",
        "name": "Stadtbahn U42",
        "disassembledName": "U42",
        "number": "U42",
        "origin": { "name": "Dortmund Hombruch" },
        "destination": { "id": "20000514", "name": "Dortmund Grotenbachstraße" }
      }
    },
    {
      "location": { "properties": { "platform": "1" } },
      "departureTimePlanned": "2024-01-15T11:40:00Z",
      "departureTimeEstimated": "2024-01-15T11:45:00Z",
      "realtimeStatus": ["MONITORED", "TRIP_CANCELLED"],
      "transportation": {
        "name": "Bus 440",
        "number": "440",
        "destination": { "name": "Hacheney" }
      }
    },
    {
      "departureTimePlanned": "2024-01-15T11:50:00Z",
      "transportation": { "name": "Niederflurbus 450", "destination": { "name": "Aplerbeck" } }
    },
    {
      "departureTimePlanned": "whenever",
      "transportation": { "number": "U47", "destination": { "name": "Westerfilde" } }
    },
    {
      "departureTimePlanned": "2024-01-15T11:55:00Z",
      "transportation": { "number": "U49", "destination": { "name": "" } }
    },
    {
      "departureTimePlanned": 17,
      "transportation": "broken"
    }
  ]
}"#;

    #[test]
    fn keeps_only_usable_events() {
        let events = normalize_stop_events(MONITOR);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn estimated_time_and_delay() {
        let events = normalize_stop_events(MONITOR);
        let u42 = &events[0];
        assert_eq!(u42.line_key, "u42");
        assert_eq!(u42.display_line, "U42");
        assert_eq!(u42.destination_key, "grotenbachstraße");
        assert_eq!(u42.origin_key.as_deref(), Some("hombruch"));
        assert_eq!(u42.display_platform.as_deref(), Some("Bstg. 2"));
        assert_eq!(u42.effective_time.to_string(), "12:33");
        assert_eq!(u42.status, EventStatus::Delayed);
    }

    #[test]
    fn cancellation_overrides_delay() {
        let events = normalize_stop_events(MONITOR);
        let bus = &events[1];
        assert_eq!(bus.display_line, "440");
        assert_eq!(bus.display_platform.as_deref(), Some("1"));
        assert_eq!(bus.status, EventStatus::Cancelled);
    }

    #[test]
    fn planned_only_is_on_time() {
        let events = normalize_stop_events(MONITOR);
        let bus = &events[2];
        assert_eq!(bus.display_line, "NIEDERFLURBUS 450");
        assert_eq!(bus.effective_time.to_string(), "12:50");
        assert_eq!(bus.status, EventStatus::OnTime);
        assert_eq!(bus.display_platform, None);
        assert_eq!(bus.origin_key, None);
    }

    #[test]
    fn station_name_from_first_location() {
        let board = parse_departure_monitor(MONITOR);
        assert_eq!(board.station_name.as_deref(), Some("Dortmund, Stadtgarten"));
        assert_eq!(board.events.len(), 3);

        let short = parse_departure_monitor(
            r#"{ "locations": [{ "disassembledName": "Stadtgarten" }], "stopEvents": [] }"#,
        );
        assert_eq!(short.station_name.as_deref(), Some("Stadtgarten"));

        let odd = parse_departure_monitor(r#"{ "locations": [7], "stopEvents": [] }"#);
        assert_eq!(odd.station_name, None);
    }

    #[test]
    fn unreadable_payload_is_empty() {
        assert_eq!(parse_departure_monitor(""), StopEventBoard::default());
        assert!(normalize_stop_events("").is_empty());
        assert!(normalize_stop_events("<html/>").is_empty());
        assert!(normalize_stop_events("{}").is_empty());
    }

    #[test]
    fn line_priority() {
        let event: EfaStopEvent = serde_json::from_str(
            r#"{
                "departureTimePlanned": "2024-01-15T11:30:00Z",
                "transportation": {
                    "name": "S-Bahn S4",
                    "number": "31404",
                    "disassembledName": "S4",
                    "destination": { "name": "Unna" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(normalize_stop_event(&event).unwrap().display_line, "S4");
    }
}
