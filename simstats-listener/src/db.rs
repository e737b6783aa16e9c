use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Config;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
}

/// Creates the statistics table
///
/// The jobs table belongs to the host engine and is only read.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS simulation_stats (
            simulation_id VARCHAR(255) PRIMARY KEY,
            completed BIGINT NOT NULL DEFAULT 0,
            completed_waiting_time BIGINT NOT NULL DEFAULT 0,
            completed_input_time BIGINT NOT NULL DEFAULT 0,
            completed_execution_time BIGINT NOT NULL DEFAULT 0,
            completed_output_time BIGINT NOT NULL DEFAULT 0,
            cancelled BIGINT NOT NULL DEFAULT 0,
            cancelled_waiting_time BIGINT NOT NULL DEFAULT 0,
            cancelled_input_time BIGINT NOT NULL DEFAULT 0,
            cancelled_execution_time BIGINT NOT NULL DEFAULT 0,
            cancelled_output_time BIGINT NOT NULL DEFAULT 0,
            failed_stalled BIGINT NOT NULL DEFAULT 0,
            failed_stalled_waiting_time BIGINT NOT NULL DEFAULT 0,
            failed_stalled_input_time BIGINT NOT NULL DEFAULT 0,
            failed_stalled_execution_time BIGINT NOT NULL DEFAULT 0,
            failed_stalled_output_time BIGINT NOT NULL DEFAULT 0,
            failed_input BIGINT NOT NULL DEFAULT 0,
            failed_input_waiting_time BIGINT NOT NULL DEFAULT 0,
            failed_input_input_time BIGINT NOT NULL DEFAULT 0,
            failed_input_execution_time BIGINT NOT NULL DEFAULT 0,
            failed_input_output_time BIGINT NOT NULL DEFAULT 0,
            failed_output BIGINT NOT NULL DEFAULT 0,
            failed_output_waiting_time BIGINT NOT NULL DEFAULT 0,
            failed_output_input_time BIGINT NOT NULL DEFAULT 0,
            failed_output_execution_time BIGINT NOT NULL DEFAULT 0,
            failed_output_output_time BIGINT NOT NULL DEFAULT 0,
            failed_application BIGINT NOT NULL DEFAULT 0,
            failed_application_waiting_time BIGINT NOT NULL DEFAULT 0,
            failed_application_input_time BIGINT NOT NULL DEFAULT 0,
            failed_application_execution_time BIGINT NOT NULL DEFAULT 0,
            failed_application_output_time BIGINT NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Stats migrations completed successfully");
    Ok(())
}
