//! Per-rule outcomes and the engine's verdict

use serde::{Deserialize, Serialize};

use crate::rules::model::Rule;

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: Rule,
    pub satisfied: bool,
    /// Why the rule could not be evaluated, when it failed closed
    pub diagnostic: Option<String>,
}

impl RuleOutcome {
    pub fn new(rule: Rule, satisfied: bool) -> Self {
        Self {
            rule,
            satisfied,
            diagnostic: None,
        }
    }

    /// An unsatisfied outcome for a rule whose evaluation failed
    pub fn failed(rule: Rule, diagnostic: impl Into<String>) -> Self {
        Self {
            rule,
            satisfied: false,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationResult {
    Valid,
    Invalid,
}

/// The engine's output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub result: ValidationResult,
    /// Message ids of the unsatisfied rules, in ascending rule order
    #[serde(rename = "messages")]
    pub violated_message_ids: Vec<String>,
}

impl Verdict {
    pub fn valid() -> Self {
        Self {
            result: ValidationResult::Valid,
            violated_message_ids: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.result == ValidationResult::Valid
    }
}
