//! Realtime change parsing.
//!
//! The change payload lists every pending change for a station, keyed by
//! the same stop ids as the planned windows. Only departure changes matter
//! here: `ct` (changed time), `cp` (changed platform) and `cs` (changed
//! status, `c` for cancelled).

use std::collections::HashMap;

use crate::domain::StopDelta;

use super::attrs::{Attributes, element_attributes, elements};

/// Status values that mark a departure as cancelled.
const CANCELLATION_TOKENS: &[&str] = &["c", "cancelled", "canceled"];

/// Parse a change payload into deltas by stop id.
///
/// Every stop with an id gets an entry, even when its departure carries no
/// change: presence in the map means the realtime system knows the stop.
pub fn parse_change_feed(payload: &str) -> HashMap<String, StopDelta> {
    elements(payload, "s")
        .into_iter()
        .filter_map(|(attrs, body)| {
            let stop_id = attrs.get("id").map(|id| id.trim()).filter(|id| !id.is_empty())?;
            let delta = element_attributes(body, "dp")
                .map(|departure| parse_delta(&departure))
                .unwrap_or_default();
            Some((stop_id.to_string(), delta))
        })
        .collect()
}

fn parse_delta(departure: &Attributes) -> StopDelta {
    let value = |name: &str| {
        departure
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let status = value("cs").or_else(|| value("status"));

    StopDelta {
        changed_time: value("ct"),
        changed_platform: value("cp"),
        cancelled: status.is_some_and(|s| is_cancellation(&s)),
    }
}

fn is_cancellation(status: &str) -> bool {
    CANCELLATION_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGES: &str = r#"<timetable station="Dortmund Hbf">
  <s id="-111-2401151230-3" eva="8000080">
    <ar ct="2401151236" cp="5"/>
    <dp ct="2401151237" cp="5"/>
  </s>
  <s id="-222-2401151241-1" eva="8000080">
    <dp cs="c" clt="2401151201"/>
  </s>
  <s id="-444-2401151300-2" eva="8000080">
    <m id="r1" t="h" c="0"/>
  </s>
  <s id="-555-2401151310-2">
    <dp CS="c" cs="A"/>
  </s>
</timetable>"#;

    #[test]
    fn delay_and_platform_change() {
        let deltas = parse_change_feed(CHANGES);
        let delta = &deltas["-111-2401151230-3"];
        assert_eq!(delta.changed_time.as_deref(), Some("2401151237"));
        assert_eq!(delta.changed_platform.as_deref(), Some("5"));
        assert!(!delta.cancelled);
    }

    #[test]
    fn cancellation_flag() {
        let deltas = parse_change_feed(CHANGES);
        let delta = &deltas["-222-2401151241-1"];
        assert!(delta.cancelled);
        assert_eq!(delta.changed_time, None);
    }

    #[test]
    fn stop_without_departure_change_has_empty_entry() {
        let deltas = parse_change_feed(CHANGES);
        assert_eq!(deltas["-444-2401151300-2"], StopDelta::default());
        assert!(!deltas.contains_key("-999"));
    }

    #[test]
    fn non_cancellation_status_is_not_cancelled() {
        let deltas = parse_change_feed(CHANGES);
        assert!(!deltas["-555-2401151310-2"].cancelled);
    }

    #[test]
    fn cancellation_is_case_insensitive() {
        assert!(is_cancellation("C"));
        assert!(is_cancellation("Cancelled"));
        assert!(is_cancellation("CANCELED"));
        assert!(!is_cancellation("p"));
        assert!(!is_cancellation("a"));
    }

    #[test]
    fn status_attribute_fallback() {
        let deltas = parse_change_feed(r#"<s id="1"><dp status="cancelled"/></s>"#);
        assert!(deltas["1"].cancelled);
    }

    #[test]
    fn garbage_yields_empty_map() {
        assert!(parse_change_feed("").is_empty());
        assert!(parse_change_feed("not markup at all").is_empty());
    }
}
