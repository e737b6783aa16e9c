//! Simstats Core
//!
//! Core types and the accrual algorithm for per-simulation job statistics.
//!
//! This crate contains:
//! - Domain types: Job records handed over by the host engine and the
//!   per-simulation aggregate
//! - DTOs: Event payloads delivered by the host engine
//! - Outcome classification and duration accrual

pub mod accrual;
pub mod domain;
pub mod dto;
pub mod outcome;

pub use accrual::{AccrualError, accrue, gap_seconds, record};
pub use outcome::classify;
