//! Rule registry routes

use crate::rules::handlers;
use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse, Scope};

use crate::types::ErrorResponse;

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::UnprocessableEntity().json(ErrorResponse {
        status: 422,
        message: err.to_string(),
        code: Some("INVALID_RULE".to_string()),
    });
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Configure `/tenant/rules` routes
pub fn configure_rule_routes() -> Scope {
    web::scope("/tenant/rules")
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("", web::get().to(handlers::list_rules))
        .route("", web::post().to(handlers::create_rule))
        .route("", web::put().to(handlers::update_rule))
        .route("/{rule_id}", web::get().to(handlers::get_rule))
}
