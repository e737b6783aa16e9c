//! Duration accrual
//!
//! Adds a finished job's phase durations to the running totals of its
//! outcome bucket.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::job::{Boundary, JobRecord};
use crate::domain::stats::{OutcomeBucket, Phase, SimulationStats};
use crate::outcome::classify;

/// Each phase and the two boundaries that delimit it
const PHASES: [(Phase, Boundary, Boundary); 4] = [
    (Phase::Waiting, Boundary::Queued, Boundary::Download),
    (Phase::Input, Boundary::Download, Boundary::Running),
    (Phase::Execution, Boundary::Running, Boundary::Upload),
    (Phase::Output, Boundary::Upload, Boundary::End),
];

/// Errors raised while accruing a job into an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccrualError {
    /// A completed job is missing a lifecycle timestamp
    #[error("completed job {job_id} has no {boundary} timestamp")]
    MissingTimestamp { job_id: String, boundary: Boundary },
}

/// Whole seconds elapsed between two timestamps
///
/// Truncates toward zero. Out-of-order timestamps yield zero so that
/// accumulators never decrease.
pub fn gap_seconds(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let millis = later.timestamp_millis() - earlier.timestamp_millis();
    if millis < 0 {
        return 0;
    }
    millis / 1000
}

/// Seconds spent between two boundaries of `job`
fn phase_gap(
    job: &JobRecord,
    from: (Boundary, DateTime<Utc>),
    to: (Boundary, DateTime<Utc>),
) -> i64 {
    if to.1 < from.1 {
        tracing::warn!(
            "Job {}: {} boundary {} precedes {} boundary {}, counting 0s",
            job.id,
            to.0,
            to.1,
            from.0,
            from.1
        );
    }
    gap_seconds(from.1, to.1)
}

/// Adds `job` to the totals of `bucket`
///
/// The completion counter always moves by one. For the completed bucket every
/// timestamp must be present, otherwise the aggregate is left untouched and an
/// error is returned. Other buckets only accrue the phases whose two
/// boundaries were both reached.
pub fn accrue(
    bucket: OutcomeBucket,
    job: &JobRecord,
    stats: &mut SimulationStats,
) -> Result<(), AccrualError> {
    let durations = if bucket == OutcomeBucket::Completed {
        complete_durations(job)?
    } else {
        reached_durations(job)
    };

    let totals = stats.bucket_mut(bucket);
    totals.count += 1;
    for (phase, secs) in durations {
        *totals.phase_secs_mut(phase) += secs;
    }

    Ok(())
}

/// Classifies `job` and accrues it into `stats`
///
/// Returns the bucket the job was counted under, or `None` when its status
/// and exit code are not counted.
pub fn record(
    job: &JobRecord,
    stats: &mut SimulationStats,
) -> Result<Option<OutcomeBucket>, AccrualError> {
    let Some(bucket) = classify(job.status, job.exit_code) else {
        return Ok(None);
    };
    accrue(bucket, job, stats)?;
    Ok(Some(bucket))
}

fn complete_durations(job: &JobRecord) -> Result<Vec<(Phase, i64)>, AccrualError> {
    let require = |boundary: Boundary| {
        job.timestamp(boundary)
            .ok_or_else(|| AccrualError::MissingTimestamp {
                job_id: job.id.clone(),
                boundary,
            })
    };

    PHASES
        .iter()
        .map(|(phase, from, to)| {
            let from = (*from, require(*from)?);
            let to = (*to, require(*to)?);
            Ok((*phase, phase_gap(job, from, to)))
        })
        .collect()
}

fn reached_durations(job: &JobRecord) -> Vec<(Phase, i64)> {
    PHASES
        .iter()
        .filter_map(|(phase, from, to)| {
            let from = (*from, job.timestamp(*from)?);
            let to = (*to, job.timestamp(*to)?);
            Some((*phase, phase_gap(job, from, to)))
        })
        .collect()
}
