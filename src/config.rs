//! Configuration management for password_validator
//!
//! Loads the app configuration from built-in defaults overlaid with
//! `PASSWORD_VALIDATOR__*` environment variables, then validates it.

use config::{Config, Environment};

use crate::types::{
    AppConfig, StartupError, DEFAULT_GATEWAY_URL, DEFAULT_HOST, DEFAULT_IDENTITY_TIMEOUT_MS,
    DEFAULT_LOG_LEVEL, DEFAULT_MODULE_TIMEOUT_MS, DEFAULT_PORT, DEFAULT_REGISTRY_TIMEOUT_MS,
    DEFAULT_WORKERS,
};

pub const ENV_PREFIX: &str = "PASSWORD_VALIDATOR";

/// Load complete app configuration
///
/// # Errors
///
/// Returns `StartupError::Config` if a variable cannot be parsed or a value is invalid.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let settings = Config::builder()
        .set_default("server.host", DEFAULT_HOST)?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("server.workers", DEFAULT_WORKERS as i64)?
        .set_default("engine.gateway_url", DEFAULT_GATEWAY_URL)?
        .set_default("engine.registry_timeout_ms", DEFAULT_REGISTRY_TIMEOUT_MS as i64)?
        .set_default("engine.identity_timeout_ms", DEFAULT_IDENTITY_TIMEOUT_MS as i64)?
        .set_default("engine.module_timeout_ms", DEFAULT_MODULE_TIMEOUT_MS as i64)?
        .set_default("engine.report_advisory_violations", true)?
        .set_default("engine.seed_default_rules", true)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration values
///
/// # Errors
///
/// Returns `StartupError::Config` describing the first invalid value.
pub fn validate_config(config: &AppConfig) -> Result<(), StartupError> {
    if config.server.port == 0 {
        return Err(StartupError::Config("Server port can't be 0".to_string()));
    }

    if config.server.workers == 0 {
        return Err(StartupError::Config("Server workers can't be 0".to_string()));
    }

    if !is_http_url(&config.engine.gateway_url) {
        return Err(StartupError::Config(format!(
            "Gateway URL must be an http(s) URL, got '{}'",
            config.engine.gateway_url
        )));
    }

    if let Some(registry_url) = &config.engine.registry_url {
        if !is_http_url(registry_url) {
            return Err(StartupError::Config(format!(
                "Registry URL must be an http(s) URL, got '{registry_url}'"
            )));
        }
    }

    let timeouts = [
        ("registry", config.engine.registry_timeout_ms),
        ("identity", config.engine.identity_timeout_ms),
        ("module", config.engine.module_timeout_ms),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            return Err(StartupError::Config(format!("The {name} timeout must be positive")));
        }
    }

    Ok(())
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
