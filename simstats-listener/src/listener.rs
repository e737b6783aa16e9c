//! Stats listener plugin
//!
//! Keeps per-simulation job statistics up to date as jobs finish.

use async_trait::async_trait;
use simstats_core::domain::job::JobRecord;
use simstats_core::domain::stats::SimulationStats;
use simstats_core::dto::event::{ExecutionOutput, JobMinorStatus};
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::db;
use crate::error::{Result, StatsError};
use crate::locks::SimulationLocks;
use crate::plugin::ListenerPlugin;
use crate::repository::{JobLookup, PgJobLookup, PgStatsStore, StatsStore};
use crate::service::stats_service;
use crate::telemetry;

/// Name the host registers the listener under
pub const PLUGIN_NAME: &str = "StatsListener";

/// Storage handles held between `load` and `terminate`
struct Backend {
    /// Pool opened by `load`, closed by `terminate`
    pool: Option<PgPool>,
    stores: Stores,
}

#[derive(Clone)]
struct Stores {
    jobs: Arc<dyn JobLookup>,
    stats: Arc<dyn StatsStore>,
}

/// Listener plugin maintaining simulation statistics
pub struct StatsListener {
    config: Config,
    /// Caller-owned storage, reinstated on every `load`
    injected: Option<Stores>,
    backend: Option<Backend>,
    locks: SimulationLocks,
}

impl StatsListener {
    /// Creates a listener that connects to the database on `load`
    pub fn new(config: Config) -> Self {
        Self {
            config,
            injected: None,
            backend: None,
            locks: SimulationLocks::new(),
        }
    }

    /// Creates a listener over storage owned by the caller
    ///
    /// `load` hands the stores to the listener instead of opening a database
    /// pool, and they survive `terminate` so the listener can be loaded again.
    pub fn with_stores(
        config: Config,
        jobs: Arc<dyn JobLookup>,
        stats: Arc<dyn StatsStore>,
    ) -> Self {
        Self {
            config,
            injected: Some(Stores { jobs, stats }),
            backend: None,
            locks: SimulationLocks::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.backend.is_some()
    }

    /// Reads back the statistics of a simulation
    pub async fn simulation_stats(&self, simulation_id: &str) -> Result<Option<SimulationStats>> {
        let backend = self.backend()?;
        stats_service::get_stats(backend.stores.stats.as_ref(), simulation_id).await
    }

    fn backend(&self) -> Result<&Backend> {
        self.backend.as_ref().ok_or(StatsError::NotLoaded)
    }

    async fn connect(&self) -> Result<Backend> {
        let pool = db::create_pool(&self.config).await.inspect_err(|e| {
            tracing::error!("Failed to connect to stats database: {}", e);
        })?;
        db::run_migrations(&pool).await?;

        Ok(Backend {
            stores: Stores {
                jobs: Arc::new(PgJobLookup::new(pool.clone())),
                stats: Arc::new(PgStatsStore::new(pool.clone())),
            },
            pool: Some(pool),
        })
    }
}

#[async_trait]
impl ListenerPlugin for StatsListener {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn load(&mut self) -> Result<()> {
        telemetry::init(&self.config.log_filter);
        tracing::info!("Loading simulation stats listener");

        self.config
            .validate()
            .map_err(|e| StatsError::Config(format!("{:#}", e)))?;

        if self.backend.is_some() {
            return Ok(());
        }

        let backend = match &self.injected {
            Some(stores) => Backend {
                pool: None,
                stores: stores.clone(),
            },
            None => self.connect().await?,
        };
        self.backend = Some(backend);

        tracing::info!("Simulation stats listener loaded");
        Ok(())
    }

    async fn job_submitted(&self, job: &JobRecord) -> Result<()> {
        tracing::debug!("Job {} submitted", job.id);
        Ok(())
    }

    async fn job_finished(&self, output: &ExecutionOutput) -> Result<()> {
        let backend = self.backend()?;
        let file_name = output.file_name(&self.config.job_id_suffix);

        stats_service::record_finished_job(
            backend.stores.jobs.as_ref(),
            backend.stores.stats.as_ref(),
            &self.locks,
            file_name,
            output.exit_code,
        )
        .await
        .inspect_err(|e| {
            tracing::error!("Rejected finished job {}: {}", output.job_id, e);
        })?;

        Ok(())
    }

    async fn job_status_changed(&self, job: &JobRecord) -> Result<()> {
        tracing::debug!("Job {} changed status to {}", job.id, job.status);
        Ok(())
    }

    async fn job_minor_status_reported(&self, status: &JobMinorStatus) -> Result<()> {
        tracing::debug!(
            "Job {} reported minor status {}",
            status.job_id,
            status.minor_status
        );
        Ok(())
    }

    async fn terminate(&mut self) {
        if let Some(backend) = self.backend.take() {
            if let Some(pool) = backend.pool {
                pool.close().await;
            }
            tracing::info!("Simulation stats listener terminated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use simstats_core::domain::job::JobStatus;
    use simstats_core::domain::stats::BucketTotals;

    use crate::repository::{InMemoryJobLookup, InMemoryStatsStore};

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(1_000_000_000 + secs, 0)
    }

    fn cancelled_job() -> JobRecord {
        JobRecord {
            id: "job-1".to_string(),
            simulation_id: "sim-1".to_string(),
            file_name: "wrapper-1".to_string(),
            status: JobStatus::Cancelled,
            exit_code: 0,
            queued: at(0),
            download: at(10),
            running: None,
            upload: None,
            end: None,
        }
    }

    fn listener_over(stats: Arc<InMemoryStatsStore>, config: Config) -> StatsListener {
        let jobs = Arc::new(InMemoryJobLookup::new());
        jobs.insert(cancelled_job());
        StatsListener::with_stores(config, jobs, stats)
    }

    async fn loaded_listener() -> (StatsListener, Arc<InMemoryStatsStore>) {
        let stats = Arc::new(InMemoryStatsStore::new());
        let mut listener = listener_over(stats.clone(), Config::default());
        listener.load().await.unwrap();
        (listener, stats)
    }

    fn output(job_id: &str) -> ExecutionOutput {
        ExecutionOutput {
            job_id: job_id.to_string(),
            exit_code: 0,
        }
    }

    #[tokio::test]
    async fn test_events_before_load_are_rejected() {
        let listener = StatsListener::new(Config::default());

        assert_eq!(listener.name(), PLUGIN_NAME);
        assert!(!listener.is_loaded());
        let err = listener.job_finished(&output("wrapper-1.jdl")).await;
        assert!(matches!(err, Err(StatsError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_injected_stores_wait_for_load() {
        let listener = listener_over(Arc::new(InMemoryStatsStore::new()), Config::default());

        assert!(!listener.is_loaded());
        let err = listener.job_finished(&output("wrapper-1.jdl")).await;
        assert!(matches!(err, Err(StatsError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_config() {
        let mut config = Config::default();
        config.max_connections = 0;
        let mut listener = StatsListener::new(config);

        let err = listener.load().await.unwrap_err();

        assert!(matches!(err, StatsError::Config(_)));
        assert!(!listener.is_loaded());
    }

    #[tokio::test]
    async fn test_load_validates_config_with_injected_stores() {
        let mut config = Config::default();
        config.database_url = String::new();
        let mut listener = listener_over(Arc::new(InMemoryStatsStore::new()), config);

        let err = listener.load().await.unwrap_err();

        assert!(matches!(err, StatsError::Config(_)));
        assert!(!listener.is_loaded());
    }

    #[tokio::test]
    async fn test_finished_job_strips_suffix_and_records() {
        let (listener, store) = loaded_listener().await;

        listener.job_finished(&output("wrapper-1.jdl")).await.unwrap();

        let stats = listener.simulation_stats("sim-1").await.unwrap().unwrap();
        assert_eq!(
            stats.cancelled,
            BucketTotals {
                count: 1,
                waiting_secs: 10,
                ..Default::default()
            }
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_job_is_rejected() {
        let (listener, store) = loaded_listener().await;

        let err = listener
            .job_finished(&output("wrapper-2.jdl"))
            .await
            .unwrap_err();

        assert!(err.is_lookup_failure());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_other_events_do_not_touch_stats() {
        let (listener, store) = loaded_listener().await;
        let job = cancelled_job();

        listener.job_submitted(&job).await.unwrap();
        listener.job_status_changed(&job).await.unwrap();
        listener
            .job_minor_status_reported(&JobMinorStatus {
                job_id: job.id.clone(),
                minor_status: 3,
                reported_at: Utc::now(),
            })
            .await
            .unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_terminate_releases_storage() {
        let (mut listener, _store) = loaded_listener().await;
        listener.terminate().await;

        assert!(!listener.is_loaded());
        let err = listener.simulation_stats("sim-1").await;
        assert!(matches!(err, Err(StatsError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_reload_reinstates_injected_stores() {
        let (mut listener, store) = loaded_listener().await;
        listener.job_finished(&output("wrapper-1.jdl")).await.unwrap();

        listener.terminate().await;
        listener.load().await.unwrap();

        assert!(listener.is_loaded());
        listener.job_finished(&output("wrapper-1.jdl")).await.unwrap();
        let stats = listener.simulation_stats("sim-1").await.unwrap().unwrap();
        assert_eq!(stats.cancelled.count, 2);
        assert_eq!(store.len(), 1);
    }
}
