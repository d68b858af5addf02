use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;

use crate::error::DatabaseError;

pub async fn make_db_pool(db_url: &str, max_connections: u32) -> Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(db_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
