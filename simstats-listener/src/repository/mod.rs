//! Repository Module
//!
//! Data access layer for the listener.
//! Repositories are trait-based so the service can run against Postgres or
//! against the in-memory implementations used by tests and embedding hosts.

pub mod job;
pub mod memory;
pub mod stats;

use async_trait::async_trait;
use simstats_core::domain::job::JobRecord;
use simstats_core::domain::stats::SimulationStats;

pub use job::PgJobLookup;
pub use memory::{InMemoryJobLookup, InMemoryStatsStore};
pub use stats::PgStatsStore;

/// Read access to the host engine's job records
#[async_trait]
pub trait JobLookup: Send + Sync {
    /// Finds every job with the given file name and exit code
    async fn find_by_file_name_and_exit_code(
        &self,
        file_name: &str,
        exit_code: i32,
    ) -> Result<Vec<JobRecord>, sqlx::Error>;
}

/// Storage for per-simulation aggregates
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Finds the aggregate of a simulation, if one was saved before
    async fn find(&self, simulation_id: &str) -> Result<Option<SimulationStats>, sqlx::Error>;

    /// Inserts or replaces the aggregate keyed by its simulation id
    async fn save(&self, stats: &SimulationStats) -> Result<(), sqlx::Error>;
}
