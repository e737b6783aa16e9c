//! Job Repository
//!
//! Reads finished job records from the host engine's job table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use simstats_core::domain::job::{JobRecord, JobStatus};
use sqlx::PgPool;

use super::JobLookup;

/// Job lookup backed by the workflows database
#[derive(Debug, Clone)]
pub struct PgJobLookup {
    pool: PgPool,
}

impl PgJobLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobLookup for PgJobLookup {
    async fn find_by_file_name_and_exit_code(
        &self,
        file_name: &str,
        exit_code: i32,
    ) -> Result<Vec<JobRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, simulation_id, file_name, status, exit_code,
                   queued, download, running, upload, end_time
            FROM jobs
            WHERE file_name = $1 AND exit_code = $2
            "#,
        )
        .bind(file_name)
        .bind(exit_code)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JobRecord::try_from).collect()
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JobRow {
    id: String,
    simulation_id: String,
    file_name: String,
    status: String,
    exit_code: i32,
    queued: Option<DateTime<Utc>>,
    download: Option<DateTime<Utc>>,
    running: Option<DateTime<Utc>>,
    upload: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl TryFrom<JobRow> for JobRecord {
    type Error = sqlx::Error;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(JobRecord {
            id: row.id,
            simulation_id: row.simulation_id,
            file_name: row.file_name,
            status,
            exit_code: row.exit_code,
            queued: row.queued,
            download: row.download,
            running: row.running,
            upload: row.upload,
            end: row.end_time,
        })
    }
}
