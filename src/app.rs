//! Application wiring
//!
//! Builds the engine and its collaborators from configuration and mounts
//! the HTTP surface.

use actix_web::web;
use std::sync::Arc;

use crate::engine::identity::HttpIdentityLookup;
use crate::engine::orchestrator::ValidationEngine;
use crate::engine::programmatic::HttpModuleClient;
use crate::health::{self, RegistryMode};
use crate::password::routes::configure_password_routes;
use crate::rules::registry::{InMemoryRuleRegistry, RuleRegistry};
use crate::rules::remote::HttpRuleRegistry;
use crate::rules::routes::configure_rule_routes;
use crate::types::{EngineConfig, StartupError};

/// Shared state cloned into every worker
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ValidationEngine>,
    /// Present when rules are served by the embedded registry
    pub rule_store: Option<Arc<InMemoryRuleRegistry>>,
}

impl AppState {
    pub fn registry_mode(&self) -> RegistryMode {
        match self.rule_store {
            Some(_) => RegistryMode::Embedded,
            None => RegistryMode::Remote,
        }
    }
}

/// Builds the engine for the given configuration
///
/// # Errors
///
/// Returns `StartupError::HttpClient` if the HTTP client cannot be created.
pub fn build_state(config: &EngineConfig) -> Result<AppState, StartupError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| StartupError::HttpClient(e.to_string()))?;

    let (registry, rule_store): (Arc<dyn RuleRegistry>, Option<Arc<InMemoryRuleRegistry>>) =
        match &config.registry_url {
            Some(url) => {
                log::info!("Reading rules from remote registry at {url}");
                let remote: Arc<dyn RuleRegistry> =
                    Arc::new(HttpRuleRegistry::new(client.clone(), url.clone(), config.registry_timeout()));
                (remote, None)
            },
            None => {
                log::info!("Serving rules from the embedded registry");
                let store = Arc::new(if config.seed_default_rules {
                    InMemoryRuleRegistry::with_default_rules()
                } else {
                    InMemoryRuleRegistry::new()
                });
                let registry: Arc<dyn RuleRegistry> = store.clone();
                (registry, Some(store))
            },
        };

    let identity = Arc::new(HttpIdentityLookup::new(
        client.clone(),
        config.gateway_url.clone(),
        config.identity_timeout(),
    ));
    let modules = Arc::new(HttpModuleClient::new(
        client,
        config.gateway_url.clone(),
        config.module_timeout(),
    ));

    Ok(AppState {
        engine: Arc::new(ValidationEngine::new(registry, identity, modules, config)),
        rule_store,
    })
}

/// Mounts all routes; `/tenant/rules` only when the embedded registry is used
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::from(state.engine.clone()))
        .app_data(web::Data::new(state.registry_mode()))
        .route("/health", web::get().to(health::health_check))
        .service(configure_password_routes());

    if let Some(store) = &state.rule_store {
        cfg.app_data(web::Data::from(store.clone())).service(configure_rule_routes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::TENANT_HEADER;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_registry_mode_follows_config() {
        let embedded = build_state(&EngineConfig::default()).unwrap();
        assert_eq!(embedded.registry_mode(), RegistryMode::Embedded);

        let remote = build_state(&EngineConfig {
            registry_url: Some("http://localhost:9130".to_string()),
            ..EngineConfig::default()
        })
        .unwrap();
        assert_eq!(remote.registry_mode(), RegistryMode::Remote);
        assert!(remote.rule_store.is_none());
    }

    #[actix_web::test]
    async fn test_embedded_registry_routes_are_mounted() {
        let state = build_state(&EngineConfig::default()).unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, &state))).await;

        let req = test::TestRequest::get()
            .uri("/tenant/rules?limit=100")
            .insert_header((TENANT_HEADER, "diku"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["totalRecords"], json!(6));

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_remote_registry_hides_rule_routes() {
        let state = build_state(&EngineConfig {
            registry_url: Some("http://localhost:9130".to_string()),
            ..EngineConfig::default()
        })
        .unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, &state))).await;

        let req = test::TestRequest::get()
            .uri("/tenant/rules")
            .insert_header((TENANT_HEADER, "diku"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
