//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Storage ===
    /// sqlx SQLite connection URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    // === Page Checks ===
    /// Connect timeout for page checks, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read timeout for page checks, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Redirects followed before a check gives up on the chain.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User-Agent header sent with page checks.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Page body bytes read for extraction; the rest is dropped.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log filter directive (`info`, `page_analyzer=debug,warn`, ...).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging; overrides `rust_log`.
    #[serde(default)]
    pub verbose: bool,
}

/// Filter used when verbose logging is on.
pub const VERBOSE_DIRECTIVE: &str = "page_analyzer=debug,info";

fn default_database_url() -> String {
    "sqlite://page_analyzer.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("page-analyzer/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_port() -> u16 {
    7070
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            db_max_connections: default_max_connections(),
            connect_timeout_secs: default_timeout_secs(),
            read_timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            max_body_bytes: default_max_body_bytes(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.trim().is_empty() {
            return Err("DATABASE_URL must not be empty".to_string());
        }

        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be at least 1".to_string());
        }

        if self.connect_timeout_secs == 0 || self.read_timeout_secs == 0 {
            return Err("CONNECT_TIMEOUT_SECS and READ_TIMEOUT_SECS must be positive".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be at least 1".to_string());
        }

        Ok(())
    }

    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Read timeout as a `Duration`.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Tracing filter directive. `--verbose` on the command line or
    /// `VERBOSE=true` wins over `RUST_LOG`.
    pub fn log_directive(&self, cli_verbose: bool) -> String {
        if cli_verbose || self.verbose {
            VERBOSE_DIRECTIVE.to_string()
        } else {
            self.rust_log.clone()
        }
    }
}
