//! Timetable reconciliation.
//!
//! Turns a station's normalized events into departure records for each
//! tracked route:
//!
//! 1. match events against the route's line and endpoints
//! 2. select the next departure(s), or the latest missed one
//! 3. recommend an action from the route's travel-time profile

mod discover;
mod error;
mod matcher;
mod recommend;
mod reconcile;
mod select;

pub use discover::{RouteCandidate, discover_routes};
pub use error::EngineError;
pub use matcher::{RouteMatcher, match_route};
pub use recommend::recommend;
pub use reconcile::{Engine, StationBoard};
pub use select::select_departures;
