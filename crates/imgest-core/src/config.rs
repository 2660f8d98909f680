//! Configuration module
//!
//! This module provides the configuration structures for the API and the ingestion
//! pipeline. Values come from the environment (optionally seeded from a `.env` file).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const IMAGE_WIDTH: u32 = 1500;
const MAX_FILE_SIZE_MB: usize = 10;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Settings of the ingestion pipeline itself
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Root directory for permanently stored, resized images
    pub base_path: PathBuf,
    /// Canonical width every stored image is normalized to
    pub image_width: u32,
    pub max_file_size_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_path: env::temp_dir().join("imgest"),
            image_width: IMAGE_WIDTH,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub app_name: String,
    pub server_port: u16,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub log_format: LogFormat,
    pub ingest: IngestConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a valid number"))?;

        let ingest = IngestConfig {
            base_path: env::var("IMAGE_BASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| IngestConfig::default().base_path),
            image_width: env::var("IMAGE_WIDTH")
                .unwrap_or_else(|_| IMAGE_WIDTH.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("IMAGE_WIDTH must be a valid number"))?,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
        };

        let config = Config {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "imgest".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            log_format: env::var("LOG_FORMAT")
                .ok()
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or_default(),
            ingest,
        };

        Ok(config)
    }

    /// Fail fast on values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL must not be empty"));
        }
        if self.ingest.image_width == 0 {
            return Err(anyhow::anyhow!("IMAGE_WIDTH must be greater than zero"));
        }
        if self.ingest.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }
        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than zero"));
        }
        if self.ingest.base_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("IMAGE_BASE_PATH must not be empty"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
