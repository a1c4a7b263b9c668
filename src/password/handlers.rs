//! Password API handlers

use actix_web::{web, HttpRequest, HttpResponse};

use crate::engine::error::EngineError;
use crate::engine::orchestrator::ValidationEngine;
use crate::password::dto::ValidatePasswordDto;
use crate::utils::request_context::tenant_context;

/// Validate a password against the tenant's rules
///
/// Responds with `{ "result": "valid" | "invalid", "messages": [...] }`.
pub async fn validate_password(
    engine: web::Data<ValidationEngine>,
    req: HttpRequest,
    payload: web::Json<ValidatePasswordDto>,
) -> Result<HttpResponse, EngineError> {
    let context = tenant_context(&req)
        .ok_or_else(|| EngineError::InvalidInput("Missing tenant header".to_string()))?;
    let payload = payload.into_inner();

    let verdict = engine.validate_password(&payload.user_id, payload.password, &context).await?;
    Ok(HttpResponse::Ok().json(verdict))
}
