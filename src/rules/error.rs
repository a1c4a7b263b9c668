//! Rule registry error types

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::types::ErrorResponse;

/// Rule registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Order number must be non-negative, got {0}")]
    NegativeOrder(i32),

    #[error("RegExp rules must use the Strong validation type")]
    AdvisoryPattern,

    #[error("RegExp rules require an expression")]
    MissingPattern,

    #[error("Programmatic rules require an implementation reference")]
    MissingImplementationReference,

    #[error("RegExp rule expression does not compile: {0}")]
    InvalidExpression(String),

    #[error("Rule id is required")]
    MissingRuleId,

    #[error("ruleId {rule_id} and id {id} refer to different rules")]
    ConflictingIds {
        rule_id: String,
        id: String,
    },

    #[error("Rule {0} was not found")]
    RuleNotFound(String),

    #[error("Missing tenant header")]
    MissingTenant,

    #[error("Unsupported query: {0}")]
    InvalidQuery(String),

    #[error("Rule registry unavailable: {0}")]
    Unavailable(String),
}

impl RegistryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::NegativeOrder(_)
            | RegistryError::AdvisoryPattern
            | RegistryError::MissingPattern
            | RegistryError::MissingImplementationReference
            | RegistryError::InvalidExpression(_)
            | RegistryError::MissingRuleId
            | RegistryError::ConflictingIds {
                ..
            }
            | RegistryError::MissingTenant
            | RegistryError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            RegistryError::RuleNotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> Option<String> {
        match self {
            RegistryError::NegativeOrder(_) => Some("NEGATIVE_ORDER".to_string()),
            RegistryError::AdvisoryPattern => Some("ADVISORY_PATTERN".to_string()),
            RegistryError::MissingPattern => Some("MISSING_PATTERN".to_string()),
            RegistryError::MissingImplementationReference => {
                Some("MISSING_IMPLEMENTATION_REFERENCE".to_string())
            },
            RegistryError::InvalidExpression(_) => Some("INVALID_EXPRESSION".to_string()),
            RegistryError::MissingRuleId => Some("MISSING_RULE_ID".to_string()),
            RegistryError::ConflictingIds {
                ..
            } => Some("CONFLICTING_RULE_IDS".to_string()),
            RegistryError::RuleNotFound(_) => Some("RULE_NOT_FOUND".to_string()),
            RegistryError::MissingTenant => Some("MISSING_TENANT".to_string()),
            RegistryError::InvalidQuery(_) => Some("INVALID_QUERY".to_string()),
            RegistryError::Unavailable(_) => Some("REGISTRY_UNAVAILABLE".to_string()),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code().as_u16(),
            message: self.to_string(),
            code: self.error_code(),
        }
    }
}

impl ResponseError for RegistryError {
    fn status_code(&self) -> StatusCode {
        self.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_response())
    }
}
