//! Service Module
//!
//! Business logic layer for the listener.
//! Services orchestrate between repositories and the accrual core.

pub mod stats;

// Re-export for convenience
pub use stats as stats_service;
