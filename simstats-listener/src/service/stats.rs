//! Stats Service
//!
//! Resolves finished jobs and folds them into their simulation's aggregate.

use simstats_core::domain::job::JobRecord;
use simstats_core::domain::stats::{OutcomeBucket, SimulationStats};
use simstats_core::record;

use crate::error::{Result, StatsError};
use crate::locks::SimulationLocks;
use crate::repository::{JobLookup, StatsStore};

/// Records a finished job into its simulation's statistics
///
/// The aggregate is fetched or created and saved back for every resolved
/// job. Returns the bucket the job was counted under, or `None` when its
/// status and exit code are not counted.
pub async fn record_finished_job(
    jobs: &dyn JobLookup,
    store: &dyn StatsStore,
    locks: &SimulationLocks,
    file_name: &str,
    exit_code: i32,
) -> Result<Option<OutcomeBucket>> {
    let candidates = jobs
        .find_by_file_name_and_exit_code(file_name, exit_code)
        .await?;
    let job = select_latest_job(candidates, file_name, exit_code)?;

    let _guard = locks.lock(&job.simulation_id).await;

    let mut stats = get_or_create(store, &job.simulation_id).await?;
    let bucket = record(&job, &mut stats)?;
    store.save(&stats).await?;

    match bucket {
        Some(bucket) => tracing::debug!(
            "Job {} counted as {} for simulation {} ({} jobs counted)",
            job.id,
            bucket,
            job.simulation_id,
            stats.total_count()
        ),
        None => tracing::warn!(
            "Job {} finished as {} with exit code {}, not counted",
            job.id,
            job.status,
            job.exit_code
        ),
    }

    Ok(bucket)
}

/// Get the statistics of a simulation, or a zeroed aggregate if none exist yet
pub async fn get_or_create(store: &dyn StatsStore, simulation_id: &str) -> Result<SimulationStats> {
    match store.find(simulation_id).await? {
        Some(stats) => Ok(stats),
        None => {
            tracing::info!("Creating stats for simulation {}", simulation_id);
            Ok(SimulationStats::new(simulation_id))
        }
    }
}

/// Get the statistics of a simulation
pub async fn get_stats(
    store: &dyn StatsStore,
    simulation_id: &str,
) -> Result<Option<SimulationStats>> {
    Ok(store.find(simulation_id).await?)
}

/// Picks the job an execution output refers to
///
/// A resubmitted job leaves several records with the same file name. The one
/// that ended last wins; a record without an end date is still finishing and
/// counts as the latest, but two of those cannot be told apart.
pub fn select_latest_job(
    mut candidates: Vec<JobRecord>,
    file_name: &str,
    exit_code: i32,
) -> Result<JobRecord> {
    let not_found = || StatsError::LookupNotFound {
        file_name: file_name.to_string(),
        exit_code,
    };

    if candidates.len() <= 1 {
        return candidates.pop().ok_or_else(not_found);
    }

    let unfinished = candidates.iter().filter(|job| job.end.is_none()).count();
    if unfinished > 1 {
        let err = StatsError::LookupAmbiguous {
            file_name: file_name.to_string(),
            simulation_id: candidates[0].simulation_id.clone(),
            unfinished,
        };
        tracing::error!("{}", err);
        return Err(err);
    }

    candidates
        .into_iter()
        .max_by_key(|job| (job.end.is_none(), job.end))
        .ok_or_else(not_found)
}
