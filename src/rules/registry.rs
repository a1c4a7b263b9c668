//! Rule registry
//!
//! The engine consumes rules through [`RuleRegistry`]. [`InMemoryRuleRegistry`]
//! is a tenant-partitioned store that also provides the create/update/get/list
//! operations exposed over `/tenant/rules`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::engine::context::TenantContext;
use crate::rules::defaults::default_rules;
use crate::rules::error::RegistryError;
use crate::rules::model::{Rule, RuleCollection, RuleKind, RuleState, Strength};

pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Source of a tenant's rules
#[async_trait]
pub trait RuleRegistry: Send + Sync {
    /// Rules of the tenant. Callers must still filter on state and sort on order.
    async fn list_enabled_rules(&self, context: &TenantContext) -> Result<Vec<Rule>, RegistryError>;
}

/// Paging and filtering for rule listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleQuery {
    /// `field=value` clauses joined with `and`; supports `type`, `state`, `validationType`, `name`
    pub filter: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for RuleQuery {
    fn default() -> Self {
        Self {
            filter: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    Kind(RuleKind),
    State(RuleState),
    Strength(Strength),
    Name(String),
}

impl Clause {
    fn matches(&self, rule: &Rule) -> bool {
        match self {
            Clause::Kind(kind) => rule.kind == *kind,
            Clause::State(state) => rule.state == *state,
            Clause::Strength(strength) => rule.strength == *strength,
            Clause::Name(name) => rule.name == *name,
        }
    }
}

fn parse_filter(filter: &str) -> Result<Vec<Clause>, RegistryError> {
    filter
        .split(" and ")
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(|clause| {
            let (field, value) = clause
                .split_once("==")
                .or_else(|| clause.split_once('='))
                .ok_or_else(|| RegistryError::InvalidQuery(clause.to_string()))?;
            let value = value.trim().trim_matches('"');
            let unsupported = || RegistryError::InvalidQuery(clause.to_string());

            match field.trim() {
                "type" => match value {
                    "RegExp" => Ok(Clause::Kind(RuleKind::Pattern)),
                    "Programmatic" => Ok(Clause::Kind(RuleKind::Delegated)),
                    _ => Err(unsupported()),
                },
                "state" => match value {
                    "Enabled" => Ok(Clause::State(RuleState::Enabled)),
                    "Disabled" => Ok(Clause::State(RuleState::Disabled)),
                    _ => Err(unsupported()),
                },
                "validationType" => match value {
                    "Strong" => Ok(Clause::Strength(Strength::Strong)),
                    "Soft" => Ok(Clause::Strength(Strength::Advisory)),
                    _ => Err(unsupported()),
                },
                "name" => Ok(Clause::Name(value.to_string())),
                _ => Err(unsupported()),
            }
        })
        .collect()
}

/// Tenant-partitioned in-process rule store
#[derive(Debug, Default)]
pub struct InMemoryRuleRegistry {
    tenants: RwLock<HashMap<String, Vec<Rule>>>,
    seed_defaults: bool,
}

impl InMemoryRuleRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry that seeds each tenant with the default rules on first use
    pub fn with_default_rules() -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
            seed_defaults: true,
        }
    }

    fn with_tenant<R>(
        &self,
        tenant: &str,
        f: impl FnOnce(&mut Vec<Rule>) -> R,
    ) -> Result<R, RegistryError> {
        if tenant.trim().is_empty() {
            return Err(RegistryError::MissingTenant);
        }

        let mut tenants = self
            .tenants
            .write()
            .map_err(|_| RegistryError::Unavailable("rule store lock poisoned".to_string()))?;
        let seed_defaults = self.seed_defaults;
        let rules = tenants.entry(tenant.to_string()).or_insert_with(|| {
            if seed_defaults {
                log::debug!("Seeding default rules for tenant {tenant}");
                default_rules()
            } else {
                Vec::new()
            }
        });

        Ok(f(rules))
    }

    /// Stores a new rule under a freshly assigned id
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the rule violates a registry constraint.
    pub fn create_rule(&self, tenant: &str, mut rule: Rule) -> Result<Rule, RegistryError> {
        rule.check_invariants()?;
        rule.rule_id = Some(Uuid::new_v4().to_string());
        rule.id = None;

        self.with_tenant(tenant, |rules| rules.push(rule.clone()))?;
        log::info!("Created rule {} for tenant {tenant}", rule.name);
        Ok(rule)
    }

    /// Replaces the rule with the same id
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::MissingRuleId`, `ConflictingIds` or `RuleNotFound`, or a
    /// constraint violation.
    pub fn update_rule(&self, tenant: &str, mut rule: Rule) -> Result<Rule, RegistryError> {
        let rule_id = rule.resolved_id()?.map(str::to_string).ok_or(RegistryError::MissingRuleId)?;
        rule.check_invariants()?;
        rule.rule_id = Some(rule_id.clone());
        rule.id = None;

        let updated = self.with_tenant(tenant, |rules| {
            match rules.iter_mut().find(|existing| existing.rule_id.as_deref() == Some(rule_id.as_str())) {
                Some(existing) => {
                    *existing = rule.clone();
                    true
                },
                None => false,
            }
        })?;

        if !updated {
            log::debug!("Rule {rule_id} was not found for tenant {tenant}");
            return Err(RegistryError::RuleNotFound(rule_id));
        }

        Ok(rule)
    }

    /// Fetches one rule by id
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RuleNotFound` if the tenant has no such rule.
    pub fn get_rule(&self, tenant: &str, rule_id: &str) -> Result<Rule, RegistryError> {
        self.with_tenant(tenant, |rules| {
            rules.iter().find(|rule| rule.rule_id.as_deref() == Some(rule_id)).cloned()
        })?
        .ok_or_else(|| RegistryError::RuleNotFound(rule_id.to_string()))
    }

    /// Lists a page of the tenant's rules matching the query filter
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidQuery` for unsupported filters.
    pub fn list_rules(&self, tenant: &str, query: &RuleQuery) -> Result<RuleCollection, RegistryError> {
        let clauses = match &query.filter {
            Some(filter) => parse_filter(filter)?,
            None => Vec::new(),
        };

        let page = self.with_tenant(tenant, |rules| {
            rules
                .iter()
                .filter(|rule| clauses.iter().all(|clause| clause.matches(rule)))
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect::<Vec<_>>()
        })?;

        Ok(RuleCollection::new(page))
    }
}

#[async_trait]
impl RuleRegistry for InMemoryRuleRegistry {
    async fn list_enabled_rules(&self, context: &TenantContext) -> Result<Vec<Rule>, RegistryError> {
        self.with_tenant(&context.tenant, |rules| {
            rules.iter().filter(|rule| rule.is_enabled()).cloned().collect()
        })
    }
}
