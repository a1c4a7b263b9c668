//! Rule model
//!
//! Value types describing a password rule. Field names on the wire follow the
//! rule registry's JSON (`ruleId`, `type`, `validationType`, `orderNo`, ...).

use serde::{Deserialize, Serialize};

use crate::engine::regex_rule;
use crate::rules::error::RegistryError;

/// How a rule is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// Evaluated locally against a regular expression
    #[serde(rename = "RegExp")]
    Pattern,
    /// Evaluated by an external rule module
    #[serde(rename = "Programmatic")]
    Delegated,
}

/// Whether a failure invalidates the password or is only reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strength {
    Strong,
    #[serde(rename = "Soft")]
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleState {
    Enabled,
    Disabled,
}

/// A single password policy rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Assigned by the registry at creation, immutable afterwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Alias of `ruleId` accepted in update requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(rename = "validationType")]
    pub strength: Strength,
    pub state: RuleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order_no: i32,
    #[serde(default)]
    pub err_message_id: String,
}

impl Rule {
    /// Creates an enabled, strong pattern rule
    pub fn pattern(
        name: impl Into<String>,
        expression: impl Into<String>,
        order_no: i32,
        err_message_id: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: None,
            id: None,
            name: name.into(),
            kind: RuleKind::Pattern,
            strength: Strength::Strong,
            state: RuleState::Enabled,
            module_name: None,
            expression: Some(expression.into()),
            implementation_reference: None,
            description: None,
            order_no,
            err_message_id: err_message_id.into(),
        }
    }

    /// Creates an enabled rule delegated to an external module
    pub fn delegated(
        name: impl Into<String>,
        implementation_reference: impl Into<String>,
        strength: Strength,
        order_no: i32,
        err_message_id: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: None,
            id: None,
            name: name.into(),
            kind: RuleKind::Delegated,
            strength,
            state: RuleState::Enabled,
            module_name: None,
            expression: None,
            implementation_reference: Some(implementation_reference.into()),
            description: None,
            order_no,
            err_message_id: err_message_id.into(),
        }
    }

    pub fn with_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.state = RuleState::Disabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.state == RuleState::Enabled
    }

    /// The expression of a pattern rule
    pub fn pattern_text(&self) -> Option<&str> {
        match self.kind {
            RuleKind::Pattern => self.expression.as_deref(),
            RuleKind::Delegated => None,
        }
    }

    /// The module reference of a delegated rule, if non-blank
    pub fn delegation_target(&self) -> Option<&str> {
        match self.kind {
            RuleKind::Delegated => {
                self.implementation_reference.as_deref().filter(|target| !target.trim().is_empty())
            },
            RuleKind::Pattern => None,
        }
    }

    /// The rule's identity, taken from `ruleId`, `id`, or both when they agree
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ConflictingIds` when both are set and differ.
    pub fn resolved_id(&self) -> Result<Option<&str>, RegistryError> {
        match (self.rule_id.as_deref(), self.id.as_deref()) {
            (Some(rule_id), Some(id)) if rule_id != id => Err(RegistryError::ConflictingIds {
                rule_id: rule_id.to_string(),
                id: id.to_string(),
            }),
            (Some(rule_id), _) => Ok(Some(rule_id)),
            (None, id) => Ok(id),
        }
    }

    /// Checks the constraints the registry enforces on create and update
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check_invariants(&self) -> Result<(), RegistryError> {
        if self.order_no < 0 {
            return Err(RegistryError::NegativeOrder(self.order_no));
        }

        match self.kind {
            RuleKind::Pattern => {
                if self.strength == Strength::Advisory {
                    return Err(RegistryError::AdvisoryPattern);
                }
                let expression = match self.expression.as_deref() {
                    Some(expression) if !expression.is_empty() => expression,
                    _ => return Err(RegistryError::MissingPattern),
                };
                regex_rule::compile(expression)
                    .map_err(|e| RegistryError::InvalidExpression(e.to_string()))?;
            },
            RuleKind::Delegated => {
                if self.delegation_target().is_none() {
                    return Err(RegistryError::MissingImplementationReference);
                }
            },
        }

        Ok(())
    }
}

/// Rule list payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCollection {
    pub rules: Vec<Rule>,
    pub total_records: usize,
}

impl RuleCollection {
    pub fn new(rules: Vec<Rule>) -> Self {
        let total_records = rules.len();
        Self {
            rules,
            total_records,
        }
    }
}
