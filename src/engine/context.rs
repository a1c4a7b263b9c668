//! Request-scoped inputs of a validation call.
//!
//! Everything here lives only for the duration of one `validate_password`
//! call and is never persisted.

use serde::Deserialize;
use std::fmt;

use crate::engine::error::EngineError;

/// Header carrying the tenant identifier.
pub const TENANT_HEADER: &str = "x-okapi-tenant";
/// Header carrying the caller's token, forwarded to collaborators.
pub const TOKEN_HEADER: &str = "x-okapi-token";
/// Header carrying the gateway base URL for collaborator calls.
pub const GATEWAY_URL_HEADER: &str = "x-okapi-url";

/// Tenant context propagated to every collaborator call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant: String,
    pub token: Option<String>,
    pub gateway_url: Option<String>,
}

impl TenantContext {
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            token: None,
            gateway_url: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }

    /// Base URL for collaborator calls, preferring the one carried by the request
    pub fn base_url<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.gateway_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => fallback,
        }
    }

    /// Attach tenant and token headers to an outbound request
    pub fn apply_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(TENANT_HEADER, &self.tenant);
        match &self.token {
            Some(token) => builder.header(TOKEN_HEADER, token),
            None => builder,
        }
    }
}

/// Candidate password. `Debug` is redacted so the value never reaches logs.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidatePassword(String);

impl CandidatePassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CandidatePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CandidatePassword(***)")
    }
}

impl From<String> for CandidatePassword {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CandidatePassword {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single validation call's inputs
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub user_id: String,
    pub password: CandidatePassword,
    pub context: TenantContext,
}

impl ValidationRequest {
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<CandidatePassword>,
        context: TenantContext,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
            context,
        }
    }

    /// Reject requests that must not reach any collaborator
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` when the user id, password or tenant is missing.
    pub fn check(&self) -> Result<(), EngineError> {
        if self.user_id.trim().is_empty() {
            return Err(EngineError::InvalidInput("User id is required".to_string()));
        }

        if self.password.is_empty() {
            return Err(EngineError::InvalidInput("Password is required".to_string()));
        }

        if self.context.tenant.trim().is_empty() {
            return Err(EngineError::InvalidInput("Tenant is required".to_string()));
        }

        Ok(())
    }
}
