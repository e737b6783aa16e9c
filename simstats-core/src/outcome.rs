//! Outcome classification
//!
//! Decides which bucket a finished job is counted under.

use crate::domain::job::JobStatus;
use crate::domain::stats::OutcomeBucket;

/// Exit code reported for a failure while fetching inputs
pub const EXIT_INPUT_ERROR: i32 = 1;
/// Exit code reported for a failure while uploading outputs
pub const EXIT_OUTPUT_ERROR: i32 = 2;
/// Exit code reported when the application itself failed
pub const EXIT_APPLICATION_ERROR: i32 = 6;

/// Maps a terminal status and exit code to an outcome bucket
///
/// Returns `None` for combinations that are not counted: a completed job with
/// a non-zero exit code, or an error with an unclassified exit code.
pub fn classify(status: JobStatus, exit_code: i32) -> Option<OutcomeBucket> {
    match status {
        JobStatus::Completed if exit_code == 0 => Some(OutcomeBucket::Completed),
        JobStatus::Completed => None,
        JobStatus::Cancelled | JobStatus::Deleted => Some(OutcomeBucket::Cancelled),
        JobStatus::Stalled => Some(OutcomeBucket::Stalled),
        JobStatus::Error => match exit_code {
            EXIT_INPUT_ERROR => Some(OutcomeBucket::FailedInput),
            EXIT_OUTPUT_ERROR => Some(OutcomeBucket::FailedOutput),
            EXIT_APPLICATION_ERROR => Some(OutcomeBucket::FailedApplication),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_requires_zero_exit_code() {
        assert_eq!(
            classify(JobStatus::Completed, 0),
            Some(OutcomeBucket::Completed)
        );
        assert_eq!(classify(JobStatus::Completed, 1), None);
        assert_eq!(classify(JobStatus::Completed, -1), None);
    }

    #[test]
    fn test_cancelled_and_deleted_share_a_bucket() {
        for code in [0, 1, 99] {
            assert_eq!(
                classify(JobStatus::Cancelled, code),
                Some(OutcomeBucket::Cancelled)
            );
            assert_eq!(
                classify(JobStatus::Deleted, code),
                Some(OutcomeBucket::Cancelled)
            );
        }
    }

    #[test]
    fn test_stalled_ignores_exit_code() {
        assert_eq!(classify(JobStatus::Stalled, 0), Some(OutcomeBucket::Stalled));
        assert_eq!(classify(JobStatus::Stalled, 6), Some(OutcomeBucket::Stalled));
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(
            classify(JobStatus::Error, 1),
            Some(OutcomeBucket::FailedInput)
        );
        assert_eq!(
            classify(JobStatus::Error, 2),
            Some(OutcomeBucket::FailedOutput)
        );
        assert_eq!(
            classify(JobStatus::Error, 6),
            Some(OutcomeBucket::FailedApplication)
        );
        for code in [0, 3, 4, 5, 7, 99, -1] {
            assert_eq!(classify(JobStatus::Error, code), None);
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        let statuses = [
            JobStatus::Completed,
            JobStatus::Cancelled,
            JobStatus::Deleted,
            JobStatus::Stalled,
            JobStatus::Error,
        ];
        for status in statuses {
            for code in -2..10 {
                assert_eq!(classify(status, code), classify(status, code));
            }
        }
    }
}
