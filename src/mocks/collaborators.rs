use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::engine::context::{TenantContext, ValidationRequest};
use crate::engine::error::{EngineError, RuleError};
use crate::engine::identity::IdentityLookup;
use crate::engine::programmatic::ModuleClient;
use crate::rules::error::RegistryError;
use crate::rules::model::Rule;
use crate::rules::registry::RuleRegistry;

/// Registry returning a fixed rule list
pub struct StaticRuleRegistry {
    rules: Vec<Rule>,
    unavailable: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticRuleRegistry {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            unavailable: false,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuleRegistry for StaticRuleRegistry {
    async fn list_enabled_rules(&self, _context: &TenantContext) -> Result<Vec<Rule>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.unavailable {
            return Err(RegistryError::Unavailable("simulated registry outage".to_string()));
        }

        Ok(self.rules.clone())
    }
}

#[derive(Debug, Clone)]
enum IdentityReply {
    Body(Value),
    FailedStatus,
    Unavailable,
}

/// Identity lookup returning a canned response
pub struct StaticIdentityLookup {
    reply: IdentityReply,
    calls: AtomicUsize,
}

impl StaticIdentityLookup {
    fn new(reply: IdentityReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    /// A well-formed response with one active user
    pub fn with_username(username: &str) -> Self {
        Self::new(IdentityReply::Body(json!({
            "users": [{
                "username": username,
                "id": "9d990cae-2685-4868-9fca-d0ad013c0640",
                "active": true
            }],
            "totalRecords": 1
        })))
    }

    /// Any response body, well-formed or not
    pub fn with_body(body: Value) -> Self {
        Self::new(IdentityReply::Body(body))
    }

    /// The service answers with a non-success status
    pub fn failing_status() -> Self {
        Self::new(IdentityReply::FailedStatus)
    }

    /// The service cannot be reached
    pub fn unavailable() -> Self {
        Self::new(IdentityReply::Unavailable)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityLookup for StaticIdentityLookup {
    async fn lookup_user(&self, user_id: &str, _context: &TenantContext) -> Result<Value, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            IdentityReply::Body(body) => Ok(body.clone()),
            IdentityReply::FailedStatus => Err(EngineError::UserLookupFailed {
                user_id: user_id.to_string(),
            }),
            IdentityReply::Unavailable => {
                Err(EngineError::IdentityUnavailable("simulated identity outage".to_string()))
            },
        }
    }
}

/// Scripted answer of a rule module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleReply {
    Satisfied,
    Unsatisfied,
    /// Answer after the given delay
    Delayed(Duration, bool),
    Status(u16),
    Transport,
}

/// Module client answering from a target-to-reply script
#[derive(Debug, Default)]
pub struct ScriptedModuleClient {
    replies: HashMap<String, ModuleReply>,
    invocations: Mutex<Vec<String>>,
}

impl ScriptedModuleClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, target: &str, reply: ModuleReply) -> Self {
        self.replies.insert(target.to_string(), reply);
        self
    }

    /// Targets invoked so far, in call order
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ModuleClient for ScriptedModuleClient {
    async fn invoke(&self, target: &str, _request: &ValidationRequest) -> Result<bool, RuleError> {
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(target.to_string());
        }

        match self.replies.get(target).copied() {
            Some(ModuleReply::Satisfied) => Ok(true),
            Some(ModuleReply::Unsatisfied) => Ok(false),
            Some(ModuleReply::Delayed(delay, satisfied)) => {
                tokio::time::sleep(delay).await;
                Ok(satisfied)
            },
            Some(ModuleReply::Status(status)) => Err(RuleError::ModuleStatus {
                target: target.to_string(),
                status,
            }),
            Some(ModuleReply::Transport) => Err(RuleError::ModuleTransport {
                target: target.to_string(),
                reason: "connection refused".to_string(),
            }),
            None => Err(RuleError::ModuleStatus {
                target: target.to_string(),
                status: 404,
            }),
        }
    }
}
