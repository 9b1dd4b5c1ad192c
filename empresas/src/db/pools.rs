//! Connection pool construction.
//!
//! Turns a [`DatabaseConfig`] into a SQLite pool:
//!
//! - `embedded` with `persistent: false`: an in-memory database held by a single pooled
//!   connection
//! - `embedded` with `persistent: true`: a database file under `data_dir`
//! - `external`: any SQLite connection URL
//!
//! Foreign keys are always enforced, since partner cascades rely on them.

use crate::config::{DatabaseConfig, PoolSettings};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

/// File name of the embedded database inside `data_dir`
pub const DATABASE_FILE: &str = "empresas.db";

/// Build connection options for the configured database
pub fn connect_options(database: &DatabaseConfig) -> anyhow::Result<SqliteConnectOptions> {
    let options = match database {
        DatabaseConfig::Embedded { persistent: false, .. } => SqliteConnectOptions::from_str("sqlite::memory:")?,
        DatabaseConfig::Embedded { persistent: true, .. } => SqliteConnectOptions::new()
            .filename(database.embedded_data_dir().join(DATABASE_FILE))
            .create_if_missing(true),
        DatabaseConfig::External { url, .. } => SqliteConnectOptions::from_str(url)?,
    };

    Ok(options.foreign_keys(true))
}

/// Pool options from the configured settings.
///
/// Every connection to `sqlite::memory:` opens its own private database, and that database
/// vanishes with the connection. In-memory pools therefore hold exactly one connection and never
/// expire it.
pub fn pool_options(settings: &PoolSettings, in_memory: bool) -> SqlitePoolOptions {
    let seconds = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));

    let options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));

    if in_memory {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .idle_timeout(seconds(settings.idle_timeout_secs))
            .max_lifetime(seconds(settings.max_lifetime_secs))
    }
}

/// Connect to the configured database, creating the embedded data directory when needed
pub async fn connect(database: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    if let DatabaseConfig::Embedded { persistent: true, .. } = database {
        let data_dir = database.embedded_data_dir();
        debug!("Using embedded database directory {}", data_dir.display());
        tokio::fs::create_dir_all(&data_dir).await?;
    }

    let in_memory = database.is_in_memory();
    if in_memory {
        info!("Database is in-memory: data will be lost on shutdown");
    }

    let pool = pool_options(database.pool_settings(), in_memory)
        .connect_with(connect_options(database)?)
        .await?;

    Ok(pool)
}
