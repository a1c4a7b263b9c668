//! Programmatic rule dispatch
//!
//! Delegated rules are evaluated by external rule modules. Any failure to get
//! a clear answer (transport error, timeout, non-success status, unreadable
//! body) is reported as a `RuleError`, which the engine records as an
//! unsatisfied outcome.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::context::ValidationRequest;
use crate::engine::error::RuleError;
use crate::utils::request_context::join_url;

/// Transport to an external rule module
#[async_trait]
pub trait ModuleClient: Send + Sync {
    /// Ask the module named by `target` whether the password satisfies its rule
    async fn invoke(&self, target: &str, request: &ValidationRequest) -> Result<bool, RuleError>;
}

#[derive(Debug, Deserialize)]
struct ModuleResponse {
    result: ModuleSignal,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModuleSignal {
    Flag(bool),
    Word(String),
}

impl ModuleSignal {
    fn satisfied(&self) -> Option<bool> {
        match self {
            ModuleSignal::Flag(flag) => Some(*flag),
            ModuleSignal::Word(word) => match word.to_ascii_lowercase().as_str() {
                "valid" => Some(true),
                "invalid" => Some(false),
                _ => None,
            },
        }
    }
}

/// Reads the validity signal out of a module's success body
///
/// # Errors
///
/// Returns `RuleError::ModuleResponse` if the body carries no recognisable signal.
pub fn interpret_module_body(target: &str, body: &serde_json::Value) -> Result<bool, RuleError> {
    let unrecognised = |reason: String| RuleError::ModuleResponse {
        target: target.to_string(),
        reason,
    };

    let response: ModuleResponse =
        serde_json::from_value(body.clone()).map_err(|e| unrecognised(e.to_string()))?;

    response
        .result
        .satisfied()
        .ok_or_else(|| unrecognised(format!("unexpected result {:?}", response.result)))
}

/// Rule module client speaking JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpModuleClient {
    client: reqwest::Client,
    default_gateway: String,
    timeout: Duration,
}

impl HttpModuleClient {
    pub fn new(client: reqwest::Client, default_gateway: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            default_gateway: default_gateway.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ModuleClient for HttpModuleClient {
    async fn invoke(&self, target: &str, request: &ValidationRequest) -> Result<bool, RuleError> {
        let url = join_url(request.context.base_url(&self.default_gateway), target);
        let body = json!({
            "userId": request.user_id,
            "password": request.password.expose(),
        });

        let response = request
            .context
            .apply_headers(self.client.post(&url).timeout(self.timeout))
            .json(&body)
            .send()
            .await
            .map_err(|e| RuleError::ModuleTransport {
                target: target.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RuleError::ModuleStatus {
                target: target.to_string(),
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| RuleError::ModuleResponse {
            target: target.to_string(),
            reason: e.to_string(),
        })?;

        interpret_module_body(target, &body)
    }
}

/// Evaluates delegated rules, bounding every module call by its own timeout
#[derive(Clone)]
pub struct ProgrammaticRuleDispatcher {
    client: Arc<dyn ModuleClient>,
    timeout: Duration,
}

impl ProgrammaticRuleDispatcher {
    pub fn new(client: Arc<dyn ModuleClient>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
        }
    }

    /// Whether the module behind `target` accepts the password
    ///
    /// # Errors
    ///
    /// Returns `RuleError` when the module cannot be reached, times out, or answers unclearly.
    pub async fn evaluate(&self, target: &str, request: &ValidationRequest) -> Result<bool, RuleError> {
        match tokio::time::timeout(self.timeout, self.client.invoke(target, request)).await {
            Ok(result) => result,
            Err(_) => Err(RuleError::ModuleTimeout {
                target: target.to_string(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
