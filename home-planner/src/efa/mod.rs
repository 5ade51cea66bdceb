//! EFA departure monitor (JSON stop events).
//!
//! An alternative to the markup feeds for networks that publish realtime
//! stop events directly. Each record carries planned and estimated times,
//! so events are normalized in one step.

mod client;
mod convert;
mod error;
mod types;

pub use client::{EfaClient, EfaConfig};
pub use convert::{
    StopEventBoard, normalize_stop_event, normalize_stop_events, parse_departure_monitor,
};
pub use error::EfaError;
pub use types::{
    EfaDepartureMonitor, EfaLocation, EfaLocationProperties, EfaPlace, EfaStopEvent,
    EfaTransportation,
};
