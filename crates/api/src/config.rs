use std::str::FromStr;

use vidcat_core::access::OwnerlessPolicy;

use crate::auth::jwt::JwtConfig;

/// Which record store backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local; data is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is [`StoreBackend::Postgres`].
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Who may mutate records that have no owner.
    pub ownerless_policy: OwnerlessPolicy,
    /// Optional cap on `?limit=`. `None` leaves it unbounded.
    pub page_limit_max: Option<u64>,
    /// Attach internal error detail to 500 responses (`APP_ENV=development`).
    pub diagnostics: bool,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `HOST`                     | `0.0.0.0`                |
    /// | `PORT`                     | `5000`                   |
    /// | `CORS_ORIGINS`             | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                     |
    /// | `STORE_BACKEND`            | `postgres`               |
    /// | `DATABASE_URL`             | required for `postgres`  |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                     |
    /// | `OWNERLESS_POLICY`         | `open`                   |
    /// | `PAGE_LIMIT_MAX`           | unset (unbounded)        |
    /// | `APP_ENV`                  | `production`             |
    /// | `LOG_FORMAT`               | `pretty`                 |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on any malformed value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store_backend: StoreBackend = std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .parse()
            .unwrap_or_else(|e| panic!("STORE_BACKEND: {e}"));

        let database_url = std::env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres {
            assert!(
                database_url.as_deref().is_some_and(|url| !url.is_empty()),
                "DATABASE_URL must be set when STORE_BACKEND=postgres"
            );
        }

        let database_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        let ownerless_policy: OwnerlessPolicy = std::env::var("OWNERLESS_POLICY")
            .unwrap_or_else(|_| "open".into())
            .parse()
            .unwrap_or_else(|e| panic!("OWNERLESS_POLICY: {e}"));

        let page_limit_max: Option<u64> = std::env::var("PAGE_LIMIT_MAX").ok().map(|raw| {
            raw.parse()
                .expect("PAGE_LIMIT_MAX must be a positive integer")
        });
        assert!(
            page_limit_max != Some(0),
            "PAGE_LIMIT_MAX must be a positive integer"
        );

        let diagnostics = std::env::var("APP_ENV").is_ok_and(|env| env == "development");

        let log_format: LogFormat = std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".into())
            .parse()
            .unwrap_or_else(|e| panic!("LOG_FORMAT: {e}"));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_backend,
            database_url,
            database_max_connections,
            jwt,
            ownerless_policy,
            page_limit_max,
            diagnostics,
            log_format,
        }
    }
}
