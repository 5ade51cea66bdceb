//! Stop events and their matching-ready projection.

use super::ident::{endpoint_key, line_key, line_label};
use super::time::FeedTime;

/// One scheduled departure at a station, as read from a planned feed.
///
/// Times are kept in their upstream encoding until normalization, so a
/// record with an odd time string survives parsing and is only dropped
/// when it has to be placed on the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopEvent {
    /// Identifier tying this event to its realtime delta. Only unique
    /// within one station's feed snapshot.
    pub stop_id: String,
    pub line: String,
    pub origin: Option<String>,
    pub destination: String,
    pub planned_time: String,
    pub changed_time: Option<String>,
    pub platform: Option<String>,
    pub changed_platform: Option<String>,
    pub cancelled: bool,
}

impl StopEvent {
    /// Normalized line code, computed on read.
    pub fn line_key(&self) -> String {
        line_key(&self.line)
    }

    /// Overlay a realtime delta onto this planned event.
    pub fn apply_delta(&mut self, delta: &StopDelta) {
        if delta.changed_time.is_some() {
            self.changed_time.clone_from(&delta.changed_time);
        }
        if delta.changed_platform.is_some() {
            self.changed_platform.clone_from(&delta.changed_platform);
        }
        self.cancelled |= delta.cancelled;
    }
}

/// A realtime change for one stop id.
///
/// An all-empty delta is still a delta: it tells us the stop is known to
/// the realtime system and nothing changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopDelta {
    pub changed_time: Option<String>,
    pub changed_platform: Option<String>,
    pub cancelled: bool,
}

/// Effective state of a departure after realtime data is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    OnTime,
    Delayed,
    Cancelled,
}

impl EventStatus {
    /// Derive the status from planned and realtime times.
    ///
    /// Cancellation wins over any delay.
    pub fn derive(planned: Option<FeedTime>, changed: Option<FeedTime>, cancelled: bool) -> Self {
        if cancelled {
            return EventStatus::Cancelled;
        }
        match (planned, changed) {
            (Some(p), Some(c)) if p != c => EventStatus::Delayed,
            _ => EventStatus::OnTime,
        }
    }
}

/// A departure ready for route matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub line_key: String,
    pub destination_key: String,
    pub origin_key: Option<String>,
    pub display_line: String,
    pub display_destination: String,
    pub display_origin: Option<String>,
    pub display_platform: Option<String>,
    /// Changed time if realtime data has one, else planned.
    pub effective_time: FeedTime,
    pub status: EventStatus,
}

impl NormalizedEvent {
    /// Build from already-resolved parts, computing the matching keys.
    ///
    /// Returns `None` when line or destination is blank.
    pub fn new(
        line: &str,
        destination: &str,
        origin: Option<&str>,
        platform: Option<&str>,
        effective_time: FeedTime,
        status: EventStatus,
    ) -> Option<Self> {
        let line = line.trim();
        let destination = destination.trim();
        if line.is_empty() || destination.is_empty() {
            return None;
        }

        let origin = origin.map(str::trim).filter(|o| !o.is_empty());
        let platform = platform.map(str::trim).filter(|p| !p.is_empty());

        Some(Self {
            line_key: line_key(line),
            destination_key: endpoint_key(destination),
            origin_key: origin.map(endpoint_key),
            display_line: line_label(line),
            display_destination: destination.to_string(),
            display_origin: origin.map(str::to_string),
            display_platform: platform.map(str::to_string),
            effective_time,
            status,
        })
    }

    /// Resolve a planned event (with any delta applied) onto the clock.
    ///
    /// Returns `None` when the planned time cannot be parsed. An unparsable
    /// changed time falls back to the planned one.
    pub fn from_stop_event(event: &StopEvent) -> Option<Self> {
        let planned = FeedTime::parse(&event.planned_time)?;
        let changed = event.changed_time.as_deref().and_then(FeedTime::parse);
        let status = EventStatus::derive(Some(planned), changed, event.cancelled);

        let platform = event
            .changed_platform
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or(event.platform.as_deref());

        Self::new(
            &event.line,
            &event.destination,
            event.origin.as_deref(),
            platform,
            changed.unwrap_or(planned),
            status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planned(stop_id: &str, time: &str) -> StopEvent {
        StopEvent {
            stop_id: stop_id.to_string(),
            line: "de:nrw.de:S 4".to_string(),
            origin: Some("Dortmund-Lütgendortmund".to_string()),
            destination: "Unna".to_string(),
            planned_time: time.to_string(),
            changed_time: None,
            platform: Some("3".to_string()),
            changed_platform: None,
            cancelled: false,
        }
    }

    #[test]
    fn planned_only_event() {
        let event = planned("1", "2401151230");
        let n = NormalizedEvent::from_stop_event(&event).unwrap();

        assert_eq!(n.line_key, "s4");
        assert_eq!(n.display_line, "S 4");
        assert_eq!(n.destination_key, "unna");
        assert_eq!(n.origin_key.as_deref(), Some("lütgendortmund"));
        assert_eq!(n.display_platform.as_deref(), Some("3"));
        assert_eq!(n.effective_time.to_string(), "12:30");
        assert_eq!(n.status, EventStatus::OnTime);
    }

    #[test]
    fn delta_overrides_planned() {
        let mut event = planned("1", "2401151230");
        event.apply_delta(&StopDelta {
            changed_time: Some("2401151237".into()),
            changed_platform: Some("5".into()),
            cancelled: false,
        });

        let n = NormalizedEvent::from_stop_event(&event).unwrap();
        assert_eq!(n.effective_time.to_string(), "12:37");
        assert_eq!(n.display_platform.as_deref(), Some("5"));
        assert_eq!(n.status, EventStatus::Delayed);
    }

    #[test]
    fn empty_delta_keeps_planned() {
        let mut event = planned("1", "2401151230");
        event.apply_delta(&StopDelta::default());

        assert_eq!(event, planned("1", "2401151230"));
    }

    #[test]
    fn changed_time_equal_to_planned_is_on_time() {
        let mut event = planned("1", "2401151230");
        event.changed_time = Some("2401151230".into());
        let n = NormalizedEvent::from_stop_event(&event).unwrap();
        assert_eq!(n.status, EventStatus::OnTime);
    }

    #[test]
    fn cancelled_overrides_delay() {
        let mut event = planned("1", "2401151230");
        event.apply_delta(&StopDelta {
            changed_time: Some("2401151245".into()),
            changed_platform: None,
            cancelled: true,
        });
        let n = NormalizedEvent::from_stop_event(&event).unwrap();
        assert_eq!(n.status, EventStatus::Cancelled);
    }

    #[test]
    fn unparsable_planned_time_is_dropped() {
        let event = planned("1", "later");
        assert!(NormalizedEvent::from_stop_event(&event).is_none());
    }

    #[test]
    fn unparsable_changed_time_falls_back() {
        let mut event = planned("1", "2401151230");
        event.changed_time = Some("??".into());
        let n = NormalizedEvent::from_stop_event(&event).unwrap();
        assert_eq!(n.effective_time.to_string(), "12:30");
        assert_eq!(n.status, EventStatus::OnTime);
    }

    #[test]
    fn blank_destination_rejected() {
        let time = FeedTime::parse("2401151230").unwrap();
        assert!(NormalizedEvent::new("S4", "  ", None, None, time, EventStatus::OnTime).is_none());
        assert!(NormalizedEvent::new("", "Unna", None, None, time, EventStatus::OnTime).is_none());
    }
}
