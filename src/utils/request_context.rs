//! Helpers shared by HTTP handlers and collaborator clients

use actix_web::HttpRequest;

use crate::engine::context::{TenantContext, GATEWAY_URL_HEADER, TENANT_HEADER, TOKEN_HEADER};

/// Builds the tenant context from the incoming request headers.
///
/// Returns `None` when the tenant header is missing or blank.
pub fn tenant_context(req: &HttpRequest) -> Option<TenantContext> {
    let tenant = header_value(req, TENANT_HEADER)?;

    let mut context = TenantContext::new(tenant);
    if let Some(token) = header_value(req, TOKEN_HEADER) {
        context = context.with_token(token);
    }
    if let Some(url) = header_value(req, GATEWAY_URL_HEADER) {
        context = context.with_gateway_url(url);
    }

    Some(context)
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Joins a base URL and a path, or returns `path` unchanged when it is already absolute
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
