//! Health Check Handler
//!
//! `GET /health` reports the service status, version, uptime and which rule
//! registry the engine reads from.

use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{SERVICE_NAME, VERSION};

static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// Service status enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
}

/// Where validation rules come from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistryMode {
    /// The embedded in-memory registry
    Embedded,
    /// A remote `/tenant/rules` service
    Remote,
}

/// Service health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: ServiceStatus,
    pub service: String,
    pub version: String,
    pub registry: RegistryMode,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the first health check or server start
    pub uptime: u64,
}

impl HealthStatus {
    pub fn current(registry: RegistryMode) -> Self {
        Self {
            status: ServiceStatus::Healthy,
            service: SERVICE_NAME.to_string(),
            version: VERSION.to_string(),
            registry,
            timestamp: Utc::now(),
            uptime: STARTED_AT.elapsed().as_secs(),
        }
    }
}

/// Starts the uptime clock
pub fn mark_started() {
    Lazy::force(&STARTED_AT);
}

/// Basic health check endpoint
pub async fn health_check(registry: web::Data<RegistryMode>) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus::current(*registry.get_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(RegistryMode::Embedded))
                .route("/health", web::get().to(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["registry"], "embedded");
        assert!(body["timestamp"].is_string());
    }
}
