//! Listener error types

use simstats_core::AccrualError;
use thiserror::Error;

/// Result type alias for listener operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that reject a lifecycle event
#[derive(Debug, Error)]
pub enum StatsError {
    /// No job matches the execution output
    #[error("no job found for {file_name} with exit code {exit_code}")]
    LookupNotFound { file_name: String, exit_code: i32 },

    /// Several matching jobs have no end date, so none can be picked
    #[error(
        "cannot select job for {file_name} in simulation {simulation_id}: \
         {unfinished} candidates have no end date"
    )]
    LookupAmbiguous {
        file_name: String,
        simulation_id: String,
        unfinished: usize,
    },

    /// The job record breaks a lifecycle invariant
    #[error("contract violation: {0}")]
    ContractViolation(#[from] AccrualError),

    /// Fetching or storing data failed
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),

    /// An event arrived before `load` or after `terminate`
    #[error("stats listener is not loaded")]
    NotLoaded,

    /// Configuration rejected at load time
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StatsError {
    /// Check if the event failed because its job could not be resolved
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::LookupNotFound { .. } | Self::LookupAmbiguous { .. }
        )
    }
}
