//! Planned + realtime merge.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{NormalizedEvent, StopDelta, StopEvent};

/// Apply realtime deltas to planned events and place them on the clock.
///
/// Events without a delta keep their planned values. Events whose planned
/// time cannot be parsed are dropped.
pub fn merge_changes(
    events: Vec<StopEvent>,
    deltas: &HashMap<String, StopDelta>,
) -> Vec<NormalizedEvent> {
    let total = events.len();

    let merged: Vec<NormalizedEvent> = events
        .into_iter()
        .filter_map(|mut event| {
            if let Some(delta) = deltas.get(&event.stop_id) {
                event.apply_delta(delta);
            }
            NormalizedEvent::from_stop_event(&event)
        })
        .collect();

    if merged.len() < total {
        debug!(total, kept = merged.len(), "dropped events with unparsable times");
    }

    merged
}
