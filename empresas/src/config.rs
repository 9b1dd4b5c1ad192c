//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `EMPRESAS_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `EMPRESAS_` override YAML values
//! 3. **DATABASE_URL** - Special case: switches to an external database at that URL
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `EMPRESAS_DATABASE__TYPE=external` sets the `database.type` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use empresas::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! EMPRESAS_PORT=8080
//!
//! # Use a database file instead of the in-memory default
//! DATABASE_URL="sqlite://empresas.db?mode=rwc"
//!
//! # Override nested values
//! EMPRESAS_DATABASE__POOL__MAX_CONNECTIONS=4
//! EMPRESAS_ENABLE_METRICS=true
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "EMPRESAS_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults defined in the `Default` implementation, so an empty (or missing)
/// config file starts a server on port 3000 with an in-memory database.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Shortcut for an external database URL, usually set through `DATABASE_URL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Database configuration - either embedded or external SQLite
    pub database: DatabaseConfig,
    /// Serve the OpenAPI document at `/api-docs/openapi.json` and its UI at `/docs`
    pub enable_docs: bool,
    /// Enable Prometheus metrics endpoint at `/internal/metrics`
    pub enable_metrics: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
    /// CORS configuration
    pub cors: CorsConfig,
}

/// Connection pool settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
    /// Time before idle connections are closed (seconds, 0 = never)
    pub idle_timeout_secs: u64,
    /// Maximum lifetime of a connection (seconds, 0 = never)
    pub max_lifetime_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 0,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

/// Database configuration.
///
/// A `database` section without a `type` key is embedded, so a lone override such as
/// `EMPRESAS_DATABASE__POOL__MAX_CONNECTIONS` tunes the default database.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", try_from = "DatabaseSection")]
pub enum DatabaseConfig {
    /// Database managed by the application itself
    Embedded {
        /// Directory where the database file is stored (default: .empresas_data)
        #[serde(skip_serializing_if = "Option::is_none")]
        data_dir: Option<PathBuf>,
        /// Whether to persist data between restarts (default: false, in-memory)
        #[serde(default)]
        persistent: bool,
        #[serde(default)]
        pool: PoolSettings,
    },
    /// Database at an explicit SQLite URL
    External {
        /// Connection string, e.g. `sqlite://empresas.db?mode=rwc`
        url: String,
        #[serde(default)]
        pool: PoolSettings,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DatabaseKind {
    Embedded,
    External,
}

/// Flat form of a `database` section, before the kind is resolved
#[derive(Debug, Deserialize)]
struct DatabaseSection {
    #[serde(rename = "type")]
    kind: Option<DatabaseKind>,
    data_dir: Option<PathBuf>,
    #[serde(default)]
    persistent: bool,
    url: Option<String>,
    #[serde(default)]
    pool: PoolSettings,
}

impl TryFrom<DatabaseSection> for DatabaseConfig {
    type Error = String;

    fn try_from(section: DatabaseSection) -> Result<Self, Self::Error> {
        match section.kind.unwrap_or(DatabaseKind::Embedded) {
            DatabaseKind::Embedded => Ok(DatabaseConfig::Embedded {
                data_dir: section.data_dir,
                persistent: section.persistent,
                pool: section.pool,
            }),
            DatabaseKind::External => {
                let url = section
                    .url
                    .ok_or_else(|| "missing field `url` for an external database".to_string())?;
                Ok(DatabaseConfig::External { url, pool: section.pool })
            }
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Embedded {
            data_dir: None,
            persistent: false,
            pool: PoolSettings::default(),
        }
    }
}

impl DatabaseConfig {
    /// Get external URL if available
    pub fn external_url(&self) -> Option<&str> {
        match self {
            DatabaseConfig::External { url, .. } => Some(url),
            DatabaseConfig::Embedded { .. } => None,
        }
    }

    /// Embedded data directory, falling back to `.empresas_data`
    pub fn embedded_data_dir(&self) -> PathBuf {
        match self {
            DatabaseConfig::Embedded { data_dir: Some(dir), .. } => dir.clone(),
            _ => PathBuf::from(".empresas_data"),
        }
    }

    /// Whether the database only lives in memory
    pub fn is_in_memory(&self) -> bool {
        match self {
            DatabaseConfig::Embedded { persistent, .. } => !persistent,
            DatabaseConfig::External { url, .. } => url.contains(":memory:") || url.contains("mode=memory"),
        }
    }

    pub fn pool_settings(&self) -> &PoolSettings {
        match self {
            DatabaseConfig::Embedded { pool, .. } => pool,
            DatabaseConfig::External { pool, .. } => pool,
        }
    }
}

/// CORS origin configuration.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

/// CORS configuration for browser clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub allowed_origins: Vec<CorsOrigin>,
    pub allow_credentials: bool,
    /// Preflight cache duration in seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: Some(3600), // Cache preflight for 1 hour
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            database: DatabaseConfig::default(),
            enable_docs: true,
            enable_metrics: false,
            enable_otel_export: false,
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // if database_url is set, use it (preserving existing pool settings)
        if let Some(url) = config.database_url.take() {
            let pool = config.database.pool_settings().clone();
            config.database = DatabaseConfig::External { url, pool };
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        let pool = self.database.pool_settings();
        if pool.max_connections == 0 {
            return Err(Error::Internal {
                operation: "Config validation: database.pool.max_connections must be at least 1".to_string(),
            });
        }

        if pool.min_connections > pool.max_connections {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: database.pool.min_connections ({}) cannot be greater than max_connections ({})",
                    pool.min_connections, pool.max_connections
                ),
            });
        }

        if let Some(url) = self.database.external_url()
            && url.trim().is_empty()
        {
            return Err(Error::Internal {
                operation: "Config validation: database.url cannot be empty for an external database".to_string(),
            });
        }

        if self.cors.allowed_origins.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: CORS allowed_origins cannot be empty. Add at least one allowed origin.".to_string(),
            });
        }

        // Validate that wildcard is not used with credentials
        let has_wildcard = self.cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard));
        if has_wildcard && self.cors.allow_credentials {
            return Err(Error::Internal {
                operation: "Config validation: CORS cannot use wildcard origin '*' with allow_credentials=true. Specify explicit origins."
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            // EMPRESAS_CONFIG names the file itself and is not a setting
            .merge(Env::prefixed("EMPRESAS_").ignore(&["config"]).split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(path: &str) -> Args {
        Args {
            config: path.to_string(),
            validate: false,
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let config = Config::load(&args("missing.yaml"))?;

            assert_eq!(config.bind_address(), "0.0.0.0:3000");
            assert!(config.database.is_in_memory());
            assert!(config.enable_docs);
            assert!(!config.enable_metrics);
            assert_eq!(config.cors.allowed_origins, vec![CorsOrigin::Wildcard]);

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "test.yaml",
                r#"
host: 127.0.0.1
port: 8000
enable_metrics: true
"#,
            )?;

            jail.set_env("EMPRESAS_PORT", "8080");
            jail.set_env("EMPRESAS_DATABASE__POOL__MAX_CONNECTIONS", "2");

            let config = Config::load(&args("test.yaml"))?;

            // Env vars should override
            assert_eq!(config.port, 8080);
            assert_eq!(config.database.pool_settings().max_connections, 2);

            // YAML values should be preserved
            assert_eq!(config.host, "127.0.0.1");
            assert!(config.enable_metrics);

            Ok(())
        });
    }

    #[test]
    fn test_database_section_without_type_is_embedded() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "test.yaml",
                r#"
database:
  persistent: true
"#,
            )?;
            jail.set_env("EMPRESAS_DATABASE__POOL__MIN_CONNECTIONS", "1");

            let config = Config::load(&args("test.yaml"))?;

            assert!(matches!(config.database, DatabaseConfig::Embedded { persistent: true, .. }));
            assert_eq!(config.database.pool_settings().min_connections, 1);
            assert_eq!(config.database.pool_settings().max_connections, 5);

            Ok(())
        });
    }

    #[test]
    fn test_external_database_requires_url() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "test.yaml",
                r#"
database:
  type: external
"#,
            )?;

            let err = Config::load(&args("test.yaml")).unwrap_err();
            assert!(err.to_string().contains("url"), "unexpected error: {err}");

            jail.create_file(
                "test.yaml",
                r#"
database:
  type: external
  url: sqlite://empresas.db?mode=rwc
"#,
            )?;
            let config = Config::load(&args("test.yaml"))?;
            assert_eq!(config.database.external_url(), Some("sqlite://empresas.db?mode=rwc"));

            Ok(())
        });
    }

    #[test]
    fn test_embedded_persistent_database() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "test.yaml",
                r#"
database:
  type: embedded
  persistent: true
  data_dir: /var/lib/empresas
  pool:
    max_connections: 3
"#,
            )?;

            let config = Config::load(&args("test.yaml"))?;

            assert!(!config.database.is_in_memory());
            assert_eq!(config.database.embedded_data_dir(), PathBuf::from("/var/lib/empresas"));
            assert_eq!(config.database.pool_settings().max_connections, 3);
            assert_eq!(config.database.pool_settings().acquire_timeout_secs, 30); // still default

            Ok(())
        });
    }

    #[test]
    fn test_database_url_switches_to_external() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "test.yaml",
                r#"
database:
  type: embedded
  pool:
    max_connections: 7
"#,
            )?;
            jail.set_env("DATABASE_URL", "sqlite://data.db?mode=rwc");

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.database.external_url(), Some("sqlite://data.db?mode=rwc"));
            assert_eq!(config.database.pool_settings().max_connections, 7);
            assert!(config.database_url.is_none());

            Ok(())
        });
    }

    #[test]
    fn test_cors_origins_parse() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "test.yaml",
                r#"
cors:
  allowed_origins:
    - "https://app.example.com"
  allow_credentials: true
"#,
            )?;

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(
                config.cors.allowed_origins,
                vec![CorsOrigin::Url(Url::parse("https://app.example.com").unwrap())]
            );
            assert!(config.cors.allow_credentials);
            assert_eq!(config.cors.max_age, Some(3600));

            Ok(())
        });
    }

    #[test]
    fn test_config_path_env_var_is_not_a_setting() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("custom.yaml", "port: 4000\n")?;
            jail.set_env("EMPRESAS_CONFIG", "custom.yaml");

            let config = Config::load(&args("custom.yaml"))?;
            assert_eq!(config.port, 4000);

            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("test.yaml", "not_a_setting: true\n")?;

            assert!(Config::load(&args("test.yaml")).is_err());

            Ok(())
        });
    }

    #[test]
    fn test_config_validation_wildcard_with_credentials() {
        let mut config = Config::default();
        config.cors.allow_credentials = true;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("wildcard"));
    }

    #[test]
    fn test_config_validation_empty_origins() {
        let mut config = Config::default();
        config.cors.allowed_origins.clear();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("allowed_origins"));
    }

    #[test]
    fn test_config_validation_pool_sizes() {
        let mut config = Config::default();
        config.database = DatabaseConfig::External {
            url: "sqlite::memory:".to_string(),
            pool: PoolSettings {
                max_connections: 2,
                min_connections: 4,
                ..Default::default()
            },
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("min_connections"));

        config.database = DatabaseConfig::External {
            url: "sqlite::memory:".to_string(),
            pool: PoolSettings {
                max_connections: 0,
                ..Default::default()
            },
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_external_url() {
        let config = Config {
            database: DatabaseConfig::External {
                url: "  ".to_string(),
                pool: PoolSettings::default(),
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_valid_config() {
        assert!(Config::default().validate().is_ok());
    }
}
