//! Departure recommendations: the engine's output per selected departure.
//!
//! The status and action strings are part of the contract with the
//! departure board and must not change.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::EventStatus;

/// Status label shown next to a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepartureStatus {
    #[serde(rename = "on time")]
    OnTime,
    #[serde(rename = "delayed")]
    Delayed,
    #[serde(rename = "cancelled")]
    Cancelled,
    /// Too early to leave; shown instead of the running status.
    #[serde(rename = "waiting")]
    Waiting,
    #[serde(rename = "no departures")]
    NoDepartures,
}

impl DepartureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepartureStatus::OnTime => "on time",
            DepartureStatus::Delayed => "delayed",
            DepartureStatus::Cancelled => "cancelled",
            DepartureStatus::Waiting => "waiting",
            DepartureStatus::NoDepartures => "no departures",
        }
    }
}

impl From<EventStatus> for DepartureStatus {
    fn from(status: EventStatus) -> Self {
        match status {
            EventStatus::OnTime => DepartureStatus::OnTime,
            EventStatus::Delayed => DepartureStatus::Delayed,
            EventStatus::Cancelled => DepartureStatus::Cancelled,
        }
    }
}

impl fmt::Display for DepartureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user should do about a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "hurry")]
    Hurry,
    #[serde(rename = "walk slowly")]
    WalkSlowly,
    /// Plenty of time; leaving now would mean waiting at the stop.
    #[serde(rename = "wait")]
    Wait,
    #[serde(rename = "wait for the next one")]
    WaitForNext,
    #[serde(rename = "add a travel time")]
    AddTravelTime,
    #[serde(rename = "check later")]
    CheckLater,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Hurry => "hurry",
            Action::WalkSlowly => "walk slowly",
            Action::Wait => "wait",
            Action::WaitForNext => "wait for the next one",
            Action::AddTravelTime => "add a travel time",
            Action::CheckLater => "check later",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the departure board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRecommendation {
    pub route_id: String,
    pub station_id: String,
    #[serde(default)]
    pub station_name: String,
    pub line: String,
    pub origin: String,
    pub destination: String,
    /// `HH:MM` in local time, or `—` when there is no departure.
    pub display_time: String,
    pub platform: String,
    pub status: DepartureStatus,
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_serializes_verbatim() {
        let json = serde_json::to_string(&Action::WaitForNext).unwrap();
        assert_eq!(json, "\"wait for the next one\"");
        let json = serde_json::to_string(&DepartureStatus::NoDepartures).unwrap();
        assert_eq!(json, "\"no departures\"");
    }

    #[test]
    fn display_matches_serialized_form() {
        for action in [
            Action::Hurry,
            Action::WalkSlowly,
            Action::Wait,
            Action::WaitForNext,
            Action::AddTravelTime,
            Action::CheckLater,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{action}\""));
        }
        for status in [
            DepartureStatus::OnTime,
            DepartureStatus::Delayed,
            DepartureStatus::Cancelled,
            DepartureStatus::Waiting,
            DepartureStatus::NoDepartures,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn record_uses_camel_case_fields() {
        let record = DepartureRecommendation {
            route_id: "r1".into(),
            station_id: "8000080".into(),
            station_name: "Dortmund Hbf".into(),
            line: "S4".into(),
            origin: "Dortmund-Lütgendortmund".into(),
            destination: "Unna".into(),
            display_time: "12:30".into(),
            platform: "3".into(),
            status: DepartureStatus::OnTime,
            action: Action::Hurry,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["routeId"], "r1");
        assert_eq!(value["stationId"], "8000080");
        assert_eq!(value["displayTime"], "12:30");
        assert_eq!(value["status"], "on time");
        assert_eq!(value["action"], "hurry");
    }
}
