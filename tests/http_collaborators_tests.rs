use password_validator::engine::context::{TenantContext, ValidationRequest};
use password_validator::engine::error::{EngineError, RuleError};
use password_validator::engine::identity::{HttpIdentityLookup, IdentityLookup, IdentityResolver};
use password_validator::engine::orchestrator::ValidationEngine;
use password_validator::engine::programmatic::{HttpModuleClient, ModuleClient};
use password_validator::rules::registry::RuleRegistry;
use password_validator::rules::remote::HttpRuleRegistry;
use password_validator::types::EngineConfig;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "9d990cae-2685-4868-9fca-d0ad013c0640";

fn context(server: &MockServer) -> TenantContext {
    TenantContext::new("diku").with_token("secret-token").with_gateway_url(server.uri())
}

fn users_body(username: &str) -> serde_json::Value {
    json!({
        "users": [{"username": username, "id": USER_ID, "active": true}],
        "totalRecords": 1
    })
}

#[tokio::test]
async fn test_identity_lookup_forwards_tenant_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("query", format!("id=={USER_ID}")))
        .and(header("x-okapi-tenant", "diku"))
        .and(header("x-okapi-token", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body("admin")))
        .expect(1)
        .mount(&server)
        .await;

    let lookup = HttpIdentityLookup::new(reqwest::Client::new(), "http://unused", Duration::from_secs(2));
    let resolver = IdentityResolver::new(Arc::new(lookup));

    let username = resolver.resolve(USER_ID, &context(&server)).await.unwrap();
    assert_eq!(username, "admin");
}

#[tokio::test]
async fn test_identity_lookup_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let lookup = HttpIdentityLookup::new(reqwest::Client::new(), server.uri(), Duration::from_secs(2));
    let err = lookup.lookup_user(USER_ID, &TenantContext::new("diku")).await.unwrap_err();

    assert!(matches!(err, EngineError::UserLookupFailed { .. }));
    assert_eq!(err.to_string(), format!("Error getting user by user id : {USER_ID}"));
}

#[tokio::test]
async fn test_module_client_posts_candidate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password/check/history"))
        .and(header("x-okapi-tenant", "diku"))
        .and(body_json(json!({"userId": USER_ID, "password": "P@sw0rd1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "invalid"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpModuleClient::new(reqwest::Client::new(), "http://unused", Duration::from_secs(2));
    let request = ValidationRequest::new(USER_ID, "P@sw0rd1", context(&server));

    let satisfied = client.invoke("/password/check/history", &request).await.unwrap();
    assert!(!satisfied);
}

#[tokio::test]
async fn test_module_client_rejects_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password/check/history"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = HttpModuleClient::new(reqwest::Client::new(), server.uri(), Duration::from_secs(2));
    let request = ValidationRequest::new(USER_ID, "P@sw0rd1", TenantContext::new("diku"));

    let err = client.invoke("/password/check/history", &request).await.unwrap_err();
    assert!(matches!(err, RuleError::ModuleStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_module_client_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password/check/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": "valid"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = HttpModuleClient::new(reqwest::Client::new(), server.uri(), Duration::from_millis(50));
    let request = ValidationRequest::new(USER_ID, "P@sw0rd1", TenantContext::new("diku"));

    let err = client.invoke("/password/check/slow", &request).await.unwrap_err();
    assert!(matches!(err, RuleError::ModuleTransport { .. }));
}

#[tokio::test]
async fn test_remote_registry_lists_rules() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenant/rules"))
        .and(query_param("query", "state=Enabled"))
        .and(header("x-okapi-tenant", "diku"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rules": [{
                "ruleId": "5105b55a-b9a3-4f76-9402-a5243ea63c95",
                "name": "password_length",
                "type": "RegExp",
                "validationType": "Strong",
                "state": "Enabled",
                "moduleName": "mod-password-validator",
                "expression": "^.{8,}$",
                "orderNo": 0,
                "errMessageId": "password.length.invalid"
            }],
            "totalRecords": 1
        })))
        .mount(&server)
        .await;

    let registry = HttpRuleRegistry::new(reqwest::Client::new(), server.uri(), Duration::from_secs(2));
    let rules = registry.list_enabled_rules(&TenantContext::new("diku")).await.unwrap();

    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].err_message_id, "password.length.invalid");
}

#[tokio::test]
async fn test_engine_over_http_collaborators() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenant/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rules": [
                {
                    "name": "password_length",
                    "type": "RegExp",
                    "validationType": "Strong",
                    "state": "Enabled",
                    "expression": "^.{8,}$",
                    "orderNo": 0,
                    "errMessageId": "password.length.invalid"
                },
                {
                    "name": "history",
                    "type": "Programmatic",
                    "validationType": "Strong",
                    "state": "Enabled",
                    "implementationReference": "/password/check/history",
                    "orderNo": 1,
                    "errMessageId": "password.history.invalid"
                }
            ],
            "totalRecords": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body("admin")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/password/check/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "invalid"})))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let config = EngineConfig {
        registry_url: Some(server.uri()),
        gateway_url: server.uri(),
        ..EngineConfig::default()
    };
    let engine = ValidationEngine::new(
        Arc::new(HttpRuleRegistry::new(client.clone(), server.uri(), config.registry_timeout())),
        Arc::new(HttpIdentityLookup::new(client.clone(), server.uri(), config.identity_timeout())),
        Arc::new(HttpModuleClient::new(client, server.uri(), config.module_timeout())),
        &config,
    );

    let verdict =
        engine.validate_password(USER_ID, "P@sw0rd", &TenantContext::new("diku")).await.unwrap();
    assert_eq!(
        verdict.violated_message_ids,
        vec!["password.length.invalid", "password.history.invalid"]
    );
}
