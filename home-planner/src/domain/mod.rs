//! Domain types for the timetable reconciliation engine.
//!
//! Upstream feeds are loosely structured; the types here are what remains
//! once a record has been validated and placed on the clock. Code that
//! receives them can trust their invariants.

mod event;
mod ident;
mod recommendation;
mod route;
mod time;

pub use event::{EventStatus, NormalizedEvent, StopDelta, StopEvent};
pub use ident::{endpoint_key, endpoints_match, line_key, line_label};
pub use recommendation::{Action, DepartureRecommendation, DepartureStatus};
pub use route::{RouteKey, TrackedRoute, TravelTime, TravelTimeProfile};
pub use time::{
    FeedTime, HourWindow, MISSING_TIME, REFERENCE_TZ, TimeError, display_time, local_now,
};
