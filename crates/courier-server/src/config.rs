//! Server configuration with layered sources.

use config::{Config, Environment, File};
use courier_core::CourierError;
use courier_queue::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS.
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,

    /// Allowed CORS origins ("*" for permissive).
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_cors_enabled(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl HttpConfig {
    /// Returns the bind address as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Simulated work handler configuration for the shipped binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Injected failure rate in `[0.0, 1.0]`.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,

    /// Minimum simulated work duration in milliseconds.
    #[serde(default = "default_min_duration")]
    pub min_duration_ms: u64,

    /// Maximum simulated work duration in milliseconds.
    #[serde(default = "default_max_duration")]
    pub max_duration_ms: u64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            failure_rate: default_failure_rate(),
            min_duration_ms: default_min_duration(),
            max_duration_ms: default_max_duration(),
        }
    }
}

fn default_failure_rate() -> f64 {
    0.1
}

fn default_min_duration() -> u64 {
    1000
}

fn default_max_duration() -> u64 {
    3000
}

/// Top-level server settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSettings {
    /// HTTP listener settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Queue engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Simulated handler settings.
    #[serde(default)]
    pub handler: HandlerConfig,
}

impl ServerSettings {
    /// Loads settings from layered sources:
    /// 1. `{config_dir}/default.toml`
    /// 2. `{config_dir}/{COURIER_ENVIRONMENT}.toml`
    /// 3. Environment variables with `COURIER_` prefix (`__` separator)
    pub fn load(config_dir: &str) -> Result<Self, CourierError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("COURIER_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("COURIER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| CourierError::Configuration(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CourierError::Configuration(e.to_string()))
    }

    /// Loads settings from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CourierError> {
        Self::load("./config")
    }
}
