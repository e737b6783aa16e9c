//! Listener plugin contract
//!
//! The host engine loads a listener once, forwards every job lifecycle
//! notification to it, and terminates it on shutdown.

use async_trait::async_trait;
use simstats_core::domain::job::JobRecord;
use simstats_core::dto::event::{ExecutionOutput, JobMinorStatus};

use crate::error::Result;

/// Lifecycle hooks a host engine drives on its listeners
#[async_trait]
pub trait ListenerPlugin: Send + Sync {
    /// Name the host registers the plugin under
    fn name(&self) -> &str;

    /// Acquires the resources the listener needs
    ///
    /// Must succeed before any event is delivered.
    async fn load(&mut self) -> Result<()>;

    /// A job was submitted to the grid
    async fn job_submitted(&self, job: &JobRecord) -> Result<()>;

    /// A job finished and produced an execution output
    async fn job_finished(&self, output: &ExecutionOutput) -> Result<()>;

    /// A job moved to another status
    async fn job_status_changed(&self, job: &JobRecord) -> Result<()>;

    /// A running job reported a minor status
    async fn job_minor_status_reported(&self, status: &JobMinorStatus) -> Result<()>;

    /// Releases everything acquired by `load`
    async fn terminate(&mut self);
}
