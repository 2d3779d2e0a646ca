//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "s3")]
use postdrop_infra::S3Config;

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Object storage; `None` runs on the in-memory store.
    #[cfg(feature = "s3")]
    pub storage: Option<S3Config>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            #[cfg(feature = "s3")]
            storage: S3Config::from_env(),
            telemetry: TelemetryConfig::from_env(),
        }
    }
}
