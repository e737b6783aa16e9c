//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Finished job as recorded by the host engine
///
/// Timestamps are only present once the job reached the matching phase.
/// A present timestamp implies every earlier one in the chain is present too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub simulation_id: String,
    pub file_name: String,
    pub status: JobStatus,
    pub exit_code: i32,
    pub queued: Option<DateTime<Utc>>,
    pub download: Option<DateTime<Utc>>,
    pub running: Option<DateTime<Utc>>,
    pub upload: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// Returns the timestamp recorded for a lifecycle boundary, if reached
    pub fn timestamp(&self, boundary: Boundary) -> Option<DateTime<Utc>> {
        match boundary {
            Boundary::Queued => self.queued,
            Boundary::Download => self.download,
            Boundary::Running => self.running,
            Boundary::Upload => self.upload,
            Boundary::End => self.end,
        }
    }
}

/// Terminal job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Completed,
    Cancelled,
    Deleted,
    Stalled,
    Error,
}

impl JobStatus {
    /// Status name as stored in the host engine's job table
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Deleted => "DELETED",
            JobStatus::Stalled => "STALLED",
            JobStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status is not one of the terminal statuses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a terminal job status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for JobStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLETED" => Ok(JobStatus::Completed),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            "DELETED" => Ok(JobStatus::Deleted),
            "STALLED" => Ok(JobStatus::Stalled),
            "ERROR" => Ok(JobStatus::Error),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Lifecycle boundary of a job, in chronological order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Boundary {
    Queued,
    Download,
    Running,
    Upload,
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Boundary::Queued => "queued",
            Boundary::Download => "download",
            Boundary::Running => "running",
            Boundary::Upload => "upload",
            Boundary::End => "end",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_table_names() {
        for status in [
            JobStatus::Completed,
            JobStatus::Cancelled,
            JobStatus::Deleted,
            JobStatus::Stalled,
            JobStatus::Error,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_non_terminal_status_is_rejected() {
        let err = "RUNNING".parse::<JobStatus>().unwrap_err();
        assert_eq!(err, ParseStatusError("RUNNING".to_string()));
    }
}
