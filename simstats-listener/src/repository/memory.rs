//! In-memory repositories
//!
//! Thread-safe stand-ins for the database tables, used by tests and by
//! hosts that keep their job records in process.

use async_trait::async_trait;
use simstats_core::domain::job::JobRecord;
use simstats_core::domain::stats::SimulationStats;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{JobLookup, StatsStore};

/// Job lookup over a list of records
#[derive(Debug, Default)]
pub struct InMemoryJobLookup {
    jobs: Mutex<Vec<JobRecord>>,
}

impl InMemoryJobLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job record
    pub fn insert(&self, job: JobRecord) {
        lock(&self.jobs).push(job);
    }
}

#[async_trait]
impl JobLookup for InMemoryJobLookup {
    async fn find_by_file_name_and_exit_code(
        &self,
        file_name: &str,
        exit_code: i32,
    ) -> Result<Vec<JobRecord>, sqlx::Error> {
        Ok(lock(&self.jobs)
            .iter()
            .filter(|job| job.file_name == file_name && job.exit_code == exit_code)
            .cloned()
            .collect())
    }
}

/// Stats store over a map keyed by simulation id
#[derive(Debug, Default)]
pub struct InMemoryStatsStore {
    stats: Mutex<HashMap<String, SimulationStats>>,
}

impl InMemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of simulations with a saved aggregate
    pub fn len(&self) -> usize {
        lock(&self.stats).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn find(&self, simulation_id: &str) -> Result<Option<SimulationStats>, sqlx::Error> {
        Ok(lock(&self.stats).get(simulation_id).cloned())
    }

    async fn save(&self, stats: &SimulationStats) -> Result<(), sqlx::Error> {
        lock(&self.stats).insert(stats.simulation_id.clone(), stats.clone());
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simstats_core::domain::job::JobStatus;

    fn job(id: &str, file_name: &str, exit_code: i32) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            simulation_id: "sim-1".to_string(),
            file_name: file_name.to_string(),
            status: JobStatus::Error,
            exit_code,
            queued: None,
            download: None,
            running: None,
            upload: None,
            end: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_filters_on_file_name_and_exit_code() {
        let lookup = InMemoryJobLookup::new();
        lookup.insert(job("a", "wrapper-1", 1));
        lookup.insert(job("b", "wrapper-1", 2));
        lookup.insert(job("c", "wrapper-2", 1));

        let found = lookup
            .find_by_file_name_and_exit_code("wrapper-1", 1)
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a");
    }

    #[tokio::test]
    async fn test_save_replaces_existing_stats() {
        let store = InMemoryStatsStore::new();
        let mut stats = SimulationStats::new("sim-1");
        store.save(&stats).await.unwrap();

        stats.stalled.count = 3;
        store.save(&stats).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.find("sim-1").await.unwrap(), Some(stats));
        assert_eq!(store.find("sim-2").await.unwrap(), None);
    }
}
