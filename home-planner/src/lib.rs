//! Departure board engine.
//!
//! Answers "when do I have to leave to catch my train?" for a set of
//! tracked routes, by reconciling planned timetables with realtime changes
//! and comparing the result with the user's travel times.

pub mod cache;
pub mod config;
pub mod domain;
pub mod dto;
pub mod efa;
pub mod engine;
pub mod fetch;
pub mod iris;
pub mod routes;
