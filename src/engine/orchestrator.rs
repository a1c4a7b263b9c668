//! Validation orchestrator
//!
//! Entry point of the engine. One call fetches the tenant's rules and the
//! user's identity concurrently, evaluates every enabled rule, and aggregates
//! the outcomes. Only registry, identity and input failures fail the call;
//! rule-level failures become unsatisfied outcomes.

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::aggregator::ResultAggregator;
use crate::engine::context::{CandidatePassword, TenantContext, ValidationRequest};
use crate::engine::error::{EngineError, RuleError};
use crate::engine::identity::{IdentityLookup, IdentityResolver};
use crate::engine::programmatic::{ModuleClient, ProgrammaticRuleDispatcher};
use crate::engine::regex_rule;
use crate::engine::verdict::{RuleOutcome, Verdict};
use crate::rules::error::RegistryError;
use crate::rules::model::{Rule, RuleKind};
use crate::rules::registry::RuleRegistry;
use crate::types::EngineConfig;

/// Enabled rules in ascending order; ties keep registry order
pub fn select_enabled(rules: Vec<Rule>) -> Vec<Rule> {
    let mut selected: Vec<Rule> = rules.into_iter().filter(Rule::is_enabled).collect();
    selected.sort_by_key(|rule| rule.order_no);
    selected
}

/// The password validation engine
pub struct ValidationEngine {
    registry: Arc<dyn RuleRegistry>,
    identity: IdentityResolver,
    dispatcher: ProgrammaticRuleDispatcher,
    aggregator: ResultAggregator,
    registry_timeout: Duration,
    identity_timeout: Duration,
}

impl ValidationEngine {
    pub fn new(
        registry: Arc<dyn RuleRegistry>,
        identity: Arc<dyn IdentityLookup>,
        modules: Arc<dyn ModuleClient>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            registry,
            identity: IdentityResolver::new(identity),
            dispatcher: ProgrammaticRuleDispatcher::new(modules, config.module_timeout()),
            aggregator: ResultAggregator::new(config.report_advisory_violations),
            registry_timeout: config.registry_timeout(),
            identity_timeout: config.identity_timeout(),
        }
    }

    /// Validates `password` for `user_id` against the tenant's active rules
    ///
    /// # Errors
    ///
    /// Returns `EngineError` for invalid input, or when the rule registry or the
    /// identity lookup fails. Rule evaluation failures never surface here.
    pub async fn validate_password(
        &self,
        user_id: &str,
        password: impl Into<CandidatePassword>,
        context: &TenantContext,
    ) -> Result<Verdict, EngineError> {
        let request = ValidationRequest::new(user_id, password, context.clone());
        self.validate(&request).await
    }

    /// Validates a prepared request
    ///
    /// # Errors
    ///
    /// See [`ValidationEngine::validate_password`].
    pub async fn validate(&self, request: &ValidationRequest) -> Result<Verdict, EngineError> {
        request.check()?;

        let (rules, username) =
            tokio::try_join!(self.fetch_rules(&request.context), self.resolve_username(request))?;

        let selected = select_enabled(rules);
        log::debug!(
            "Evaluating {} enabled rules for user {} of tenant {}",
            selected.len(),
            request.user_id,
            request.context.tenant
        );

        let outcomes =
            join_all(selected.into_iter().map(|rule| self.evaluate_rule(rule, request, &username)))
                .await;

        let verdict = self.aggregator.aggregate(outcomes);
        log::debug!(
            "Verdict for user {}: {:?} {:?}",
            request.user_id,
            verdict.result,
            verdict.violated_message_ids
        );
        Ok(verdict)
    }

    async fn fetch_rules(&self, context: &TenantContext) -> Result<Vec<Rule>, EngineError> {
        match tokio::time::timeout(self.registry_timeout, self.registry.list_enabled_rules(context)).await
        {
            Ok(Ok(rules)) => Ok(rules),
            Ok(Err(err)) => {
                log::error!("Fetching rules for tenant {} failed: {err}", context.tenant);
                Err(err.into())
            },
            Err(_) => {
                log::error!("Fetching rules for tenant {} timed out", context.tenant);
                Err(RegistryError::Unavailable(format!(
                    "no response within {} ms",
                    self.registry_timeout.as_millis()
                ))
                .into())
            },
        }
    }

    async fn resolve_username(&self, request: &ValidationRequest) -> Result<String, EngineError> {
        let resolution = self.identity.resolve(&request.user_id, &request.context);
        match tokio::time::timeout(self.identity_timeout, resolution).await {
            Ok(Ok(username)) => Ok(username),
            Ok(Err(err)) => {
                log::error!("Resolving user {} failed: {err}", request.user_id);
                Err(err)
            },
            Err(_) => {
                log::error!("Resolving user {} timed out", request.user_id);
                Err(EngineError::IdentityUnavailable(format!(
                    "no response within {} ms",
                    self.identity_timeout.as_millis()
                )))
            },
        }
    }

    async fn evaluate_rule(&self, rule: Rule, request: &ValidationRequest, username: &str) -> RuleOutcome {
        let evaluation = match rule.kind {
            RuleKind::Pattern => match rule.pattern_text() {
                Some(pattern) => regex_rule::evaluate(
                    &regex_rule::substitute_username(pattern, username),
                    request.password.expose(),
                ),
                None => Err(RuleError::MissingPattern),
            },
            RuleKind::Delegated => match rule.delegation_target() {
                Some(target) => self.dispatcher.evaluate(target, request).await,
                None => Err(RuleError::MissingTarget),
            },
        };

        match evaluation {
            Ok(satisfied) => RuleOutcome::new(rule, satisfied),
            Err(err) => {
                log::warn!("Rule '{}' could not be evaluated, counting it as unsatisfied: {err}", rule.name);
                RuleOutcome::failed(rule, err.to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::verdict::ValidationResult;
    use crate::mocks::collaborators::{
        ModuleReply, ScriptedModuleClient, StaticIdentityLookup, StaticRuleRegistry,
    };
    use crate::rules::model::Strength;

    fn engine(rules: Vec<Rule>, modules: ScriptedModuleClient) -> ValidationEngine {
        ValidationEngine::new(
            Arc::new(StaticRuleRegistry::new(rules)),
            Arc::new(StaticIdentityLookup::with_username("admin")),
            Arc::new(modules),
            &EngineConfig::default(),
        )
    }

    #[test]
    fn test_select_enabled_filters_and_sorts() {
        let rules = vec![
            Rule::pattern("c", "^.+$", 5, "c"),
            Rule::pattern("a", "^.+$", 1, "a").disabled(),
            Rule::pattern("b", "^.+$", 0, "b"),
        ];

        let names: Vec<String> = select_enabled(rules).into_iter().map(|rule| rule.name).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_malformed_pattern_fails_only_its_rule() {
        let rules = vec![
            Rule::pattern("broken", "(unclosed", 0, "broken.invalid"),
            Rule::pattern("length", "^.{8,}$", 1, "length.invalid"),
        ];

        let verdict = engine(rules, ScriptedModuleClient::new())
            .validate_password("user-1", "P@sw0rd1", &TenantContext::new("diku"))
            .await
            .unwrap();

        assert_eq!(verdict.result, ValidationResult::Invalid);
        assert_eq!(verdict.violated_message_ids, vec!["broken.invalid"]);
    }

    #[tokio::test]
    async fn test_delegated_rule_failing_closed() {
        let rules = vec![
            Rule::delegated("history", "/history", Strength::Strong, 0, "history.invalid"),
            Rule::delegated("blocklist", "/blocklist", Strength::Strong, 1, "blocklist.invalid"),
        ];
        let modules = ScriptedModuleClient::new()
            .with_reply("/history", ModuleReply::Transport)
            .with_reply("/blocklist", ModuleReply::Satisfied);

        let verdict = engine(rules, modules)
            .validate_password("user-1", "P@sw0rd1", &TenantContext::new("diku"))
            .await
            .unwrap();

        assert_eq!(verdict.result, ValidationResult::Invalid);
        assert_eq!(verdict.violated_message_ids, vec!["history.invalid"]);
    }

    #[tokio::test]
    async fn test_invalid_input_skips_collaborators() {
        let registry = Arc::new(StaticRuleRegistry::new(Vec::new()));
        let identity = Arc::new(StaticIdentityLookup::with_username("admin"));
        let engine = ValidationEngine::new(
            registry.clone(),
            identity.clone(),
            Arc::new(ScriptedModuleClient::new()),
            &EngineConfig::default(),
        );

        let result = engine.validate_password("user-1", "", &TenantContext::new("diku")).await;
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
        assert_eq!(registry.calls(), 0);
        assert_eq!(identity.calls(), 0);
    }
}
