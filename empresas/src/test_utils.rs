//! Test utilities for integration testing.

use crate::config::{Config, DatabaseConfig, PoolSettings};
use crate::db::pools;
use axum_test::TestServer;
use sqlx::SqlitePool;

/// Fresh in-memory database with the schema applied.
///
/// Each call gets its own isolated database, held by the pool's single connection.
pub async fn create_test_pool() -> SqlitePool {
    let pool = pools::connect(&create_test_config().database)
        .await
        .expect("Failed to create test database");
    crate::migrator().run(&pool).await.expect("Failed to run migrations");
    pool
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Embedded {
            data_dir: None,
            persistent: false,
            pool: PoolSettings {
                max_connections: 1,
                min_connections: 1,
                acquire_timeout_secs: 5,
                ..Default::default()
            },
        },
        ..Default::default()
    }
}

/// Full application router over `pool`, wrapped in a [`TestServer`]
pub async fn create_test_app(pool: SqlitePool) -> TestServer {
    crate::Application::new_with_pool(create_test_config(), Some(pool))
        .await
        .expect("Failed to create application")
        .into_test_server()
}
