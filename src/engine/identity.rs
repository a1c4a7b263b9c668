//! Identity resolution
//!
//! Fetches the username for a user id from the identity lookup service and
//! validates the shape of its answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::context::TenantContext;
use crate::engine::error::EngineError;
use crate::utils::request_context::join_url;

const USERS_FIELD: &str = "users";
const TOTAL_RECORDS_FIELD: &str = "totalRecords";
const USERS_PATH: &str = "/users";

/// Directory service returning the raw user lookup response
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Raw lookup body. A non-success answer from the service is an error.
    async fn lookup_user(&self, user_id: &str, context: &TenantContext) -> Result<Value, EngineError>;
}

/// A user record in the lookup response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// Extracts the single username from a lookup body
///
/// # Errors
///
/// Returns `MalformedUserResponse` when `users` or `totalRecords` is missing,
/// `UserNotFound` for zero records and `AmbiguousUser` for several.
pub fn parse_username(user_id: &str, body: &Value) -> Result<String, EngineError> {
    let (Some(users), Some(total_records)) = (body.get(USERS_FIELD), body.get(TOTAL_RECORDS_FIELD))
    else {
        return Err(EngineError::MalformedUserResponse);
    };

    let total_records = total_records.as_u64().ok_or(EngineError::MalformedUserResponse)?;
    let users: Vec<UserRecord> =
        serde_json::from_value(users.clone()).map_err(|_| EngineError::MalformedUserResponse)?;

    if total_records == 0 || users.is_empty() {
        return Err(EngineError::UserNotFound {
            user_id: user_id.to_string(),
        });
    }

    let mut users = users.into_iter();
    match (users.next(), users.next()) {
        (Some(user), None) => Ok(user.username),
        _ => Err(EngineError::AmbiguousUser {
            user_id: user_id.to_string(),
            count: usize::try_from(total_records).unwrap_or(usize::MAX).max(2),
        }),
    }
}

/// Resolves user ids to usernames
#[derive(Clone)]
pub struct IdentityResolver {
    lookup: Arc<dyn IdentityLookup>,
}

impl IdentityResolver {
    pub fn new(lookup: Arc<dyn IdentityLookup>) -> Self {
        Self {
            lookup,
        }
    }

    /// Username of `user_id`
    ///
    /// # Errors
    ///
    /// Propagates lookup failures and shape violations of the response.
    pub async fn resolve(&self, user_id: &str, context: &TenantContext) -> Result<String, EngineError> {
        let body = self.lookup.lookup_user(user_id, context).await?;
        parse_username(user_id, &body)
    }
}

/// Identity lookup served by `GET /users?query=id==<userId>`
#[derive(Debug, Clone)]
pub struct HttpIdentityLookup {
    client: reqwest::Client,
    default_gateway: String,
    timeout: Duration,
}

impl HttpIdentityLookup {
    pub fn new(client: reqwest::Client, default_gateway: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            default_gateway: default_gateway.into(),
            timeout,
        }
    }
}

#[async_trait]
impl IdentityLookup for HttpIdentityLookup {
    async fn lookup_user(&self, user_id: &str, context: &TenantContext) -> Result<Value, EngineError> {
        let url = join_url(context.base_url(&self.default_gateway), USERS_PATH);
        let request = self
            .client
            .get(&url)
            .query(&[("query", format!("id=={user_id}"))])
            .timeout(self.timeout);

        let response = context
            .apply_headers(request)
            .send()
            .await
            .map_err(|e| EngineError::IdentityUnavailable(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            log::error!(
                "User lookup for {user_id} failed with status {}",
                response.status().as_u16()
            );
            return Err(EngineError::UserLookupFailed {
                user_id: user_id.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::IdentityUnavailable(format!("unreadable user response: {e}")))
    }
}
