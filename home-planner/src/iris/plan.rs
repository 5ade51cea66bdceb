//! Planned timetable parsing.
//!
//! A planned payload covers one station for one clock hour:
//!
//! ```text
//! <timetable station="Dortmund Hbf">
//!   <s id="-7874571842864554321-2401151230-3">
//!     <tl c="S" n="30455" f="S" o="800337"/>
//!     <ar pt="2401151228" pp="3" l="4" ppth="Dortmund-Lütgendortmund|Dortmund-Marten"/>
//!     <dp pt="2401151230" pp="3" l="4" ppth="Dortmund Stadthaus|Unna"/>
//!   </s>
//! </timetable>
//! ```

use tracing::debug;

use crate::domain::StopEvent;

use super::attrs::{Attributes, element_attributes, elements};

/// Events parsed from one planned window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannedFeed {
    /// Station name declared by the payload, used as origin for trips that
    /// start here.
    pub station_name: Option<String>,
    pub events: Vec<StopEvent>,
}

/// Parse one planned window into stop events, in payload order.
///
/// Stops without a departure, or whose departure lacks a line, a
/// destination or a planned time, are dropped.
pub fn parse_planned_feed(payload: &str) -> PlannedFeed {
    let station_name = element_attributes(payload, "timetable")
        .and_then(|attrs| non_empty(&attrs, "station").map(str::to_string));

    let stops = elements(payload, "s");
    let total = stops.len();

    let events: Vec<StopEvent> = stops
        .into_iter()
        .filter_map(|(attrs, body)| parse_stop(&attrs, body, station_name.as_deref()))
        .collect();

    if events.len() < total {
        debug!(total, kept = events.len(), "dropped incomplete planned stops");
    }

    PlannedFeed {
        station_name,
        events,
    }
}

fn parse_stop(attrs: &Attributes, body: &str, station_hint: Option<&str>) -> Option<StopEvent> {
    let stop_id = non_empty(attrs, "id")?;
    let departure = element_attributes(body, "dp")?;
    let trip = element_attributes(body, "tl").unwrap_or_default();

    let line = line_name(&departure, &trip)?;
    let destination = non_empty(&departure, "ppth").and_then(last_segment)?;
    let planned_time = non_empty(&departure, "pt")?;

    let origin = element_attributes(body, "ar")
        .as_ref()
        .and_then(|arrival| non_empty(arrival, "ppth"))
        .and_then(first_segment)
        .or(station_hint)
        .map(str::to_string);

    Some(StopEvent {
        stop_id: stop_id.to_string(),
        line,
        origin,
        destination: destination.to_string(),
        planned_time: planned_time.to_string(),
        changed_time: None,
        platform: non_empty(&departure, "pp").map(str::to_string),
        changed_platform: None,
        cancelled: false,
    })
}

/// Line label for a departure.
///
/// Numeric line codes are qualified with the trip category ("S" + "4");
/// trips without a line code fall back to category and number ("ICE 123").
fn line_name(departure: &Attributes, trip: &Attributes) -> Option<String> {
    let category = non_empty(trip, "c");

    match (non_empty(departure, "l"), category) {
        (Some(line), Some(category)) if line.bytes().all(|b| b.is_ascii_digit()) => {
            Some(format!("{category}{line}"))
        }
        (Some(line), _) => Some(line.to_string()),
        (None, Some(category)) => {
            non_empty(trip, "n").map(|number| format!("{category} {number}"))
        }
        (None, None) => None,
    }
}

fn non_empty<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a str> {
    attrs
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn first_segment(path: &str) -> Option<&str> {
    path.split('|').map(str::trim).find(|s| !s.is_empty())
}

fn last_segment(path: &str) -> Option<&str> {
    path.rsplit('|').map(str::trim).find(|s| !s.is_empty())
}
