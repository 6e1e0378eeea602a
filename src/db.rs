//! Database connection pool

use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;

use crate::config::Settings;

/// Create the PostgreSQL pool. The connection is lazy so the simulator and
/// estimate endpoints stay up while the database is unreachable.
pub fn create_pool(settings: &Settings) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&settings.database_url)
        .context("Invalid DATABASE_URL")?
        .application_name("buildsim-backend");

    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .min_connections(0)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy_with(connect_options);

    tracing::info!(
        max_connections = settings.database_max_connections,
        "Database connection pool configured"
    );

    Ok(pool)
}
