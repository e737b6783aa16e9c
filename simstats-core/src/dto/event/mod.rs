//! Event DTOs delivered by the host engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of a finished execution, as reported by the host engine
///
/// `job_id` is the identifier the grid middleware returned on submission and
/// may carry a descriptor suffix (e.g. `.jdl`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub job_id: String,
    pub exit_code: i32,
}

impl ExecutionOutput {
    /// Returns the job file name with the descriptor suffix removed
    pub fn file_name(&self, suffix: &str) -> &str {
        if suffix.is_empty() {
            return &self.job_id;
        }
        self.job_id.strip_suffix(suffix).unwrap_or(self.job_id.as_str())
    }
}

/// Minor status reported by a job while it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMinorStatus {
    pub job_id: String,
    pub minor_status: i32,
    pub reported_at: DateTime<Utc>,
}
