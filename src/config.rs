use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::env;

/// Main configuration for the inference service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Number of worker threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: num_cpus::get(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level name, e.g. `INFO`
    pub level: String,

    /// Service name stamped on every record
    pub service: String,

    /// Deployment environment
    pub env: String,

    /// Service version
    pub version: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            service: crate::NAME.to_string(),
            env: "local".to_string(),
            version: "dev".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Effective level filter; unknown names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        parse_log_level(&self.level)
    }
}

/// Parse a level name case-insensitively, falling back to `Info`.
///
/// `CRITICAL` and `FATAL` map to `Error` and `WARNING` to `Warn` so the
/// usual deployment spellings keep working.
pub fn parse_log_level(raw: &str) -> LevelFilter {
    match raw.trim().to_uppercase().as_str() {
        "TRACE" => LevelFilter::Trace,
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "ERROR" | "CRITICAL" | "FATAL" => LevelFilter::Error,
        "OFF" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration the way the binary does: optional `CONFIG_PATH`
    /// file first, then environment overrides.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit key lookup.
    pub fn load_from<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup("CONFIG_PATH") {
            Some(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        base.with_overrides(lookup)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn with_overrides<F>(mut self, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| crate::Error::config(format!("invalid PORT value '{}'", port)))?;
        }
        if let Some(workers) = get("WORKERS") {
            let parsed: usize = workers
                .trim()
                .parse()
                .map_err(|_| crate::Error::config(format!("invalid WORKERS value '{}'", workers)))?;
            if parsed == 0 {
                return Err(crate::Error::config("WORKERS must be at least 1"));
            }
            self.server.workers = parsed;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(service) = get("SERVICE_NAME") {
            self.logging.service = service;
        }
        if let Some(app_env) = get("APP_ENV").or_else(|| get("ENV")) {
            self.logging.env = app_env;
        }
        if let Some(version) = get("APP_VERSION") {
            self.logging.version = version;
        }

        Ok(self)
    }
}
