//! Route discovery from a station's planned departures.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{StopEvent, line_label};

/// A route that can be tracked from a station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCandidate {
    pub line: String,
    pub origin: String,
    pub destination: String,
}

/// Distinct line/origin/destination combinations among `events`.
///
/// Sorted by line, then destination, then origin. Lines are given in
/// display form, so spelling variants of one line collapse.
pub fn discover_routes(events: &[StopEvent]) -> Vec<RouteCandidate> {
    let distinct: BTreeSet<(String, String, String)> = events
        .iter()
        .map(|event| {
            (
                line_label(&event.line),
                event.destination.trim().to_string(),
                event.origin.as_deref().unwrap_or_default().trim().to_string(),
            )
        })
        .filter(|(line, destination, _)| !line.is_empty() && !destination.is_empty())
        .collect();

    distinct
        .into_iter()
        .map(|(line, destination, origin)| RouteCandidate {
            line,
            origin,
            destination,
        })
        .collect()
}
