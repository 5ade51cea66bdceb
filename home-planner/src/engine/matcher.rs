//! Route matching against a station's events.

use crate::domain::{NormalizedEvent, TrackedRoute, endpoint_key, endpoints_match, line_key};

/// Matching keys for one tracked route, computed once per pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatcher {
    line_key: String,
    destination_key: String,
    origin_key: Option<String>,
}

impl RouteMatcher {
    pub fn new(route: &TrackedRoute) -> Self {
        Self {
            line_key: line_key(&route.line),
            destination_key: endpoint_key(route.key.destination()),
            origin_key: route
                .key
                .origin()
                .map(endpoint_key)
                .filter(|key| !key.is_empty()),
        }
    }

    /// Whether `event` is a trip of this route.
    ///
    /// Line keys must be equal and destinations must match by prefix. The
    /// origin is only compared when both the route and the event know it.
    pub fn matches(&self, event: &NormalizedEvent) -> bool {
        if self.line_key.is_empty() || event.line_key != self.line_key {
            return false;
        }
        if !endpoints_match(&event.destination_key, &self.destination_key) {
            return false;
        }
        match (&self.origin_key, &event.origin_key) {
            (Some(route_origin), Some(event_origin)) => {
                endpoints_match(event_origin, route_origin)
            }
            _ => true,
        }
    }
}

/// All events of `route` among `events`, in input order.
pub fn match_route<'a>(
    route: &TrackedRoute,
    events: &'a [NormalizedEvent],
) -> Vec<&'a NormalizedEvent> {
    let matcher = RouteMatcher::new(route);
    events.iter().filter(|e| matcher.matches(e)).collect()
}
