//! Simstats Listener
//!
//! Listener plugin that keeps per-simulation job statistics for a workflow
//! execution engine.
//!
//! Architecture:
//! - Plugin: lifecycle hooks the host engine drives (`ListenerPlugin`)
//! - Repositories: job lookup and stats storage (Postgres or in-memory)
//! - Services: job selection, fetch-or-create and accrual under a
//!   per-simulation lock
//!
//! # Example
//!
//! ```no_run
//! use simstats_core::dto::event::ExecutionOutput;
//! use simstats_listener::{Config, ListenerPlugin, StatsListener};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut listener = StatsListener::new(Config::from_env()?);
//!     listener.load().await?;
//!
//!     listener
//!         .job_finished(&ExecutionOutput {
//!             job_id: "wrapper-1234.jdl".to_string(),
//!             exit_code: 0,
//!         })
//!         .await?;
//!
//!     listener.terminate().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod listener;
pub mod locks;
pub mod plugin;
pub mod repository;
pub mod service;
mod telemetry;

pub use config::Config;
pub use error::{Result, StatsError};
pub use listener::{PLUGIN_NAME, StatsListener};
pub use plugin::ListenerPlugin;
