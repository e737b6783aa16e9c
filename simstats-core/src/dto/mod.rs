//! Data Transfer Objects
//!
//! Payloads the host engine hands to listener plugins alongside lifecycle
//! notifications.

pub mod event;
