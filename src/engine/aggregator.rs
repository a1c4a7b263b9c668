//! Combines per-rule outcomes into a verdict.

use crate::engine::verdict::{RuleOutcome, ValidationResult, Verdict};
use crate::rules::model::Strength;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultAggregator {
    report_advisory_violations: bool,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ResultAggregator {
    pub fn new(report_advisory_violations: bool) -> Self {
        Self {
            report_advisory_violations,
        }
    }

    /// Invalid iff a strong rule is unsatisfied. Messages follow ascending rule
    /// order whatever order the outcomes arrive in.
    pub fn aggregate(&self, mut outcomes: Vec<RuleOutcome>) -> Verdict {
        outcomes.sort_by_key(|outcome| outcome.rule.order_no);

        let mut result = ValidationResult::Valid;
        let mut violated_message_ids = Vec::new();

        for outcome in outcomes.into_iter().filter(|outcome| !outcome.satisfied) {
            match outcome.rule.strength {
                Strength::Strong => {
                    result = ValidationResult::Invalid;
                    violated_message_ids.push(outcome.rule.err_message_id);
                },
                Strength::Advisory if self.report_advisory_violations => {
                    violated_message_ids.push(outcome.rule.err_message_id);
                },
                Strength::Advisory => {},
            }
        }

        Verdict {
            result,
            violated_message_ids,
        }
    }
}
