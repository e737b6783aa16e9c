//! Stats Repository
//!
//! Persists one aggregate row per simulation in `simulation_stats`.
//! Every bucket maps to five columns: `<bucket>` for the counter and
//! `<bucket>_{waiting,input,execution,output}_time` for the durations.

use async_trait::async_trait;
use simstats_core::domain::stats::{OutcomeBucket, Phase, SimulationStats};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::StatsStore;

/// Stats store backed by the workflows database
#[derive(Debug, Clone)]
pub struct PgStatsStore {
    pool: PgPool,
}

impl PgStatsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsStore for PgStatsStore {
    async fn find(&self, simulation_id: &str) -> Result<Option<SimulationStats>, sqlx::Error> {
        let sql = format!(
            "SELECT simulation_id, {} FROM simulation_stats WHERE simulation_id = $1",
            bucket_columns().join(", ")
        );

        let row = sqlx::query(&sql)
            .bind(simulation_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(stats_from_row).transpose()
    }

    async fn save(&self, stats: &SimulationStats) -> Result<(), sqlx::Error> {
        let sql = upsert_sql();

        let mut query = sqlx::query(&sql).bind(&stats.simulation_id);
        for bucket in OutcomeBucket::ALL {
            let totals = stats.bucket(bucket);
            query = query.bind(totals.count);
            for (phase, _) in PHASE_COLUMNS {
                query = query.bind(totals.phase_secs(phase));
            }
        }

        query.execute(&self.pool).await?;

        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

const PHASE_COLUMNS: [(Phase, &str); 4] = [
    (Phase::Waiting, "waiting_time"),
    (Phase::Input, "input_time"),
    (Phase::Execution, "execution_time"),
    (Phase::Output, "output_time"),
];

/// Counter and duration columns, in bind order
fn bucket_columns() -> Vec<String> {
    let mut columns = Vec::with_capacity(OutcomeBucket::ALL.len() * 5);
    for bucket in OutcomeBucket::ALL {
        columns.push(bucket.as_str().to_string());
        for (_, suffix) in PHASE_COLUMNS {
            columns.push(format!("{}_{}", bucket.as_str(), suffix));
        }
    }
    columns
}

fn upsert_sql() -> String {
    let columns = bucket_columns();
    let placeholders: Vec<String> = (2..=columns.len() + 1).map(|i| format!("${}", i)).collect();
    let updates: Vec<String> = columns
        .iter()
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect();

    format!(
        "INSERT INTO simulation_stats (simulation_id, {}) VALUES ($1, {}) \
         ON CONFLICT (simulation_id) DO UPDATE SET {}",
        columns.join(", "),
        placeholders.join(", "),
        updates.join(", ")
    )
}

fn stats_from_row(row: &PgRow) -> Result<SimulationStats, sqlx::Error> {
    let mut stats = SimulationStats::new(row.try_get::<String, _>("simulation_id")?);

    for bucket in OutcomeBucket::ALL {
        let totals = stats.bucket_mut(bucket);
        totals.count = row.try_get(bucket.as_str())?;
        for (phase, suffix) in PHASE_COLUMNS {
            let column = format!("{}_{}", bucket.as_str(), suffix);
            *totals.phase_secs_mut(phase) = row.try_get(column.as_str())?;
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_columns_follow_table_layout() {
        let columns = bucket_columns();

        assert_eq!(columns.len(), 30);
        assert_eq!(columns[0], "completed");
        assert_eq!(columns[1], "completed_waiting_time");
        assert_eq!(columns[4], "completed_output_time");
        assert_eq!(columns[10], "failed_stalled");
        assert_eq!(columns[29], "failed_application_output_time");
    }

    #[test]
    fn test_upsert_binds_every_column() {
        let sql = upsert_sql();

        assert!(sql.starts_with("INSERT INTO simulation_stats (simulation_id, completed,"));
        assert!(sql.contains("VALUES ($1, $2,"));
        assert!(sql.contains("$31)"));
        assert!(!sql.contains("$32"));
        assert!(sql.contains("ON CONFLICT (simulation_id) DO UPDATE SET completed = EXCLUDED.completed"));
    }
}
