//! Core domain types
//!
//! Job records are owned by the host engine and only read here.
//! Simulation statistics are the one aggregate this crate mutates.

pub mod job;
pub mod stats;
