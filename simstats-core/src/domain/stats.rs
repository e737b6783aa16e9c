//! Simulation statistics domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome a finished job is counted under
///
/// Deleted jobs share the `Cancelled` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeBucket {
    Completed,
    Cancelled,
    Stalled,
    FailedInput,
    FailedOutput,
    FailedApplication,
}

impl OutcomeBucket {
    pub const ALL: [OutcomeBucket; 6] = [
        OutcomeBucket::Completed,
        OutcomeBucket::Cancelled,
        OutcomeBucket::Stalled,
        OutcomeBucket::FailedInput,
        OutcomeBucket::FailedOutput,
        OutcomeBucket::FailedApplication,
    ];

    /// Column prefix used when the aggregate is persisted
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeBucket::Completed => "completed",
            OutcomeBucket::Cancelled => "cancelled",
            OutcomeBucket::Stalled => "failed_stalled",
            OutcomeBucket::FailedInput => "failed_input",
            OutcomeBucket::FailedOutput => "failed_output",
            OutcomeBucket::FailedApplication => "failed_application",
        }
    }
}

impl fmt::Display for OutcomeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval between two consecutive lifecycle boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Queued until input download starts
    Waiting,
    /// Input download until the application starts running
    Input,
    /// Application run until output upload starts
    Execution,
    /// Output upload until the job ends
    Output,
}

/// Counter and accumulated phase durations for one outcome bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub count: i64,
    pub waiting_secs: i64,
    pub input_secs: i64,
    pub execution_secs: i64,
    pub output_secs: i64,
}

impl BucketTotals {
    pub fn phase_secs(&self, phase: Phase) -> i64 {
        match phase {
            Phase::Waiting => self.waiting_secs,
            Phase::Input => self.input_secs,
            Phase::Execution => self.execution_secs,
            Phase::Output => self.output_secs,
        }
    }

    pub fn phase_secs_mut(&mut self, phase: Phase) -> &mut i64 {
        match phase {
            Phase::Waiting => &mut self.waiting_secs,
            Phase::Input => &mut self.input_secs,
            Phase::Execution => &mut self.execution_secs,
            Phase::Output => &mut self.output_secs,
        }
    }
}

/// Running totals for every job finished under one simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub simulation_id: String,
    pub completed: BucketTotals,
    pub cancelled: BucketTotals,
    pub stalled: BucketTotals,
    pub failed_input: BucketTotals,
    pub failed_output: BucketTotals,
    pub failed_application: BucketTotals,
}

impl SimulationStats {
    /// Creates an aggregate with every counter at zero
    pub fn new(simulation_id: impl Into<String>) -> Self {
        Self {
            simulation_id: simulation_id.into(),
            completed: BucketTotals::default(),
            cancelled: BucketTotals::default(),
            stalled: BucketTotals::default(),
            failed_input: BucketTotals::default(),
            failed_output: BucketTotals::default(),
            failed_application: BucketTotals::default(),
        }
    }

    pub fn bucket(&self, bucket: OutcomeBucket) -> &BucketTotals {
        match bucket {
            OutcomeBucket::Completed => &self.completed,
            OutcomeBucket::Cancelled => &self.cancelled,
            OutcomeBucket::Stalled => &self.stalled,
            OutcomeBucket::FailedInput => &self.failed_input,
            OutcomeBucket::FailedOutput => &self.failed_output,
            OutcomeBucket::FailedApplication => &self.failed_application,
        }
    }

    pub fn bucket_mut(&mut self, bucket: OutcomeBucket) -> &mut BucketTotals {
        match bucket {
            OutcomeBucket::Completed => &mut self.completed,
            OutcomeBucket::Cancelled => &mut self.cancelled,
            OutcomeBucket::Stalled => &mut self.stalled,
            OutcomeBucket::FailedInput => &mut self.failed_input,
            OutcomeBucket::FailedOutput => &mut self.failed_output,
            OutcomeBucket::FailedApplication => &mut self.failed_application,
        }
    }

    /// Number of finished jobs counted across all buckets
    pub fn total_count(&self) -> i64 {
        OutcomeBucket::ALL
            .iter()
            .map(|bucket| self.bucket(*bucket).count)
            .sum()
    }
}
