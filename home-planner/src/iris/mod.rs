//! Markup timetable feeds (planned windows and realtime changes).
//!
//! Key characteristics of these feeds:
//! - Planned data is published per station and per clock hour; a board
//!   near the end of an hour needs the next window as well
//! - Changes are published per station without a window and reference
//!   planned stops by id
//! - Times are compact local digit strings (`YYMMDDHHmm`)
//! - Payloads are scraped, not validated: incomplete stops are dropped

mod attrs;
mod changes;
mod client;
mod error;
mod merge;
mod plan;

pub use attrs::{Attributes, element_attributes, elements, extract_attributes};
pub use changes::parse_change_feed;
pub use client::{IrisClient, IrisConfig};
pub use error::IrisError;
pub use merge::merge_changes;
pub use plan::{PlannedFeed, parse_planned_feed};
