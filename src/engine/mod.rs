//! Password validation engine
//!
//! Given a tenant's rules, a candidate password and a user id, produces a
//! pass/fail verdict and the ordered list of violated rule messages.
//! - `regex_rule`: local pattern rules
//! - `programmatic`: rules delegated to external modules
//! - `identity`: username resolution
//! - `aggregator`: outcome aggregation
//! - `orchestrator`: the `validate_password` entry point

pub mod aggregator;
pub mod context;
pub mod error;
pub mod identity;
pub mod orchestrator;
pub mod programmatic;
pub mod regex_rule;
pub mod verdict;

pub use context::{CandidatePassword, TenantContext, ValidationRequest};
pub use error::{EngineError, RuleError};
pub use orchestrator::ValidationEngine;
pub use verdict::{RuleOutcome, ValidationResult, Verdict};
