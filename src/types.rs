//! Type definitions for password_validator
//!
//! Contains shared error response shapes, startup errors, and configuration
//! models used throughout the app.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:9130";
pub const DEFAULT_REGISTRY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_IDENTITY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MODULE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Standard error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Application startup errors
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    #[error("Server binding error: {0}")]
    ServerBind(String),
}

impl From<config::ConfigError> for StartupError {
    fn from(error: config::ConfigError) -> Self {
        StartupError::Config(error.to_string())
    }
}

/// Complete app configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

/// Validation engine configuration, read-only after startup
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Remote rule registry; the embedded in-memory registry is used when absent
    #[serde(default)]
    pub registry_url: Option<String>,
    /// Base URL for identity and module calls when the request carries none
    pub gateway_url: String,
    pub registry_timeout_ms: u64,
    pub identity_timeout_ms: u64,
    pub module_timeout_ms: u64,
    /// Whether unsatisfied advisory rules contribute their message ids
    pub report_advisory_violations: bool,
    /// Seed each tenant of the in-memory registry with the default rule set
    pub seed_default_rules: bool,
}

impl EngineConfig {
    pub fn registry_timeout(&self) -> Duration {
        Duration::from_millis(self.registry_timeout_ms)
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_millis(self.identity_timeout_ms)
    }

    pub fn module_timeout(&self) -> Duration {
        Duration::from_millis(self.module_timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registry_url: None,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            registry_timeout_ms: DEFAULT_REGISTRY_TIMEOUT_MS,
            identity_timeout_ms: DEFAULT_IDENTITY_TIMEOUT_MS,
            module_timeout_ms: DEFAULT_MODULE_TIMEOUT_MS,
            report_advisory_violations: true,
            seed_default_rules: true,
        }
    }
}
