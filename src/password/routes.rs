//! Password routes

use crate::password::handlers;
use actix_web::{web, Scope};

/// Configure password validation routes
pub fn configure_password_routes() -> Scope {
    web::scope("/password").route("/validate", web::post().to(handlers::validate_password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::TENANT_HEADER;
    use crate::engine::orchestrator::ValidationEngine;
    use crate::mocks::collaborators::{ScriptedModuleClient, StaticIdentityLookup, StaticRuleRegistry};
    use crate::rules::defaults::default_rules;
    use crate::types::EngineConfig;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn engine(identity: StaticIdentityLookup) -> web::Data<ValidationEngine> {
        web::Data::new(ValidationEngine::new(
            Arc::new(StaticRuleRegistry::new(default_rules())),
            Arc::new(identity),
            Arc::new(ScriptedModuleClient::new()),
            &EngineConfig::default(),
        ))
    }

    #[actix_web::test]
    async fn test_validate_returns_verdict() {
        let app = test::init_service(
            App::new()
                .app_data(engine(StaticIdentityLookup::with_username("admin")))
                .service(configure_password_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/password/validate")
            .insert_header((TENANT_HEADER, "diku"))
            .set_json(json!({"userId": "user-1", "password": "P@sw0rd"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["result"], "invalid");
        assert_eq!(body["messages"], json!(["password.length.invalid"]));
    }

    #[actix_web::test]
    async fn test_missing_tenant_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(engine(StaticIdentityLookup::with_username("admin")))
                .service(configure_password_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/password/validate")
            .set_json(json!({"userId": "user-1", "password": "P@sw0rd1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_failed_user_lookup_is_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(engine(StaticIdentityLookup::failing_status()))
                .service(configure_password_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/password/validate")
            .insert_header((TENANT_HEADER, "diku"))
            .set_json(json!({"userId": "user-1", "password": "P@sw0rd1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Error getting user by user id : user-1");
    }
}
