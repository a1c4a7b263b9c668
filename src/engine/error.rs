//! Engine error types
//!
//! `EngineError` fails a whole validation call. `RuleError` is contained to a
//! single rule's outcome and never escapes the engine.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::rules::error::RegistryError;
use crate::types::ErrorResponse;

/// Whole-call validation failures
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rule registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Identity lookup unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("Error, missing field(s) 'totalRecords' and/or 'users' in user response object")]
    MalformedUserResponse,

    #[error("Error getting user by user id : {user_id}")]
    UserLookupFailed {
        user_id: String,
    },

    #[error("User with id {user_id} was not found")]
    UserNotFound {
        user_id: String,
    },

    #[error("Expected one user with id {user_id}, found {count}")]
    AmbiguousUser {
        user_id: String,
        count: usize,
    },
}

impl EngineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::UserNotFound {
                ..
            } => StatusCode::NOT_FOUND,
            EngineError::Registry(_)
            | EngineError::IdentityUnavailable(_)
            | EngineError::MalformedUserResponse
            | EngineError::UserLookupFailed {
                ..
            }
            | EngineError::AmbiguousUser {
                ..
            } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> Option<String> {
        let code = match self {
            EngineError::InvalidInput(_) => "INVALID_INPUT",
            EngineError::Registry(_) => "RULE_REGISTRY_ERROR",
            EngineError::IdentityUnavailable(_) => "IDENTITY_UNAVAILABLE",
            EngineError::MalformedUserResponse => "MALFORMED_USER_RESPONSE",
            EngineError::UserLookupFailed {
                ..
            } => "USER_LOOKUP_FAILED",
            EngineError::UserNotFound {
                ..
            } => "USER_NOT_FOUND",
            EngineError::AmbiguousUser {
                ..
            } => "AMBIGUOUS_USER",
        };
        Some(code.to_string())
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code().as_u16(),
            message: self.to_string(),
            code: self.error_code(),
        }
    }
}

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        self.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_response())
    }
}

/// Per-rule evaluation failures, absorbed into an unsatisfied outcome
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Pattern could not be evaluated: {0}")]
    PatternEvaluation(String),

    #[error("Rule has no expression")]
    MissingPattern,

    #[error("Rule has no implementation reference")]
    MissingTarget,

    #[error("Call to module {target} failed: {reason}")]
    ModuleTransport {
        target: String,
        reason: String,
    },

    #[error("Module {target} responded with status {status}")]
    ModuleStatus {
        target: String,
        status: u16,
    },

    #[error("Module {target} did not respond within {timeout_ms} ms")]
    ModuleTimeout {
        target: String,
        timeout_ms: u64,
    },

    #[error("Module {target} returned an unrecognised response: {reason}")]
    ModuleResponse {
        target: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_lookup_message_names_user_id() {
        let err = EngineError::UserLookupFailed {
            user_id: "db6ffb67-3160-43bf-8e2f-ecf9a420288b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error getting user by user id : db6ffb67-3160-43bf-8e2f-ecf9a420288b"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            EngineError::InvalidInput("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngineError::UserNotFound {
                user_id: "u".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(EngineError::MalformedUserResponse.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_to_response() {
        let response = EngineError::MalformedUserResponse.to_response();
        assert_eq!(response.status, 500);
        assert_eq!(response.code.as_deref(), Some("MALFORMED_USER_RESPONSE"));
        assert!(response.message.contains("'totalRecords' and/or 'users'"));
    }
}
