//! Departure selection.

use chrono::{DateTime, Utc};

use crate::config::SelectionMode;
use crate::domain::NormalizedEvent;

/// Pick the departures to show from a route's matching events.
///
/// Upcoming events (at or after `now`) are preferred, earliest first, up to
/// the mode's limit. When none are upcoming the latest past event is
/// returned alone, so a just-missed departure is still shown. Empty input
/// gives empty output.
pub fn select_departures<'a>(
    candidates: Vec<&'a NormalizedEvent>,
    now: DateTime<Utc>,
    mode: SelectionMode,
) -> Vec<&'a NormalizedEvent> {
    let (mut upcoming, past): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|e| e.effective_time.instant() >= now);

    if upcoming.is_empty() {
        return past
            .into_iter()
            .max_by_key(|e| e.effective_time)
            .into_iter()
            .collect();
    }

    upcoming.sort_by_key(|e| e.effective_time);
    upcoming.truncate(mode.limit());
    upcoming
}
