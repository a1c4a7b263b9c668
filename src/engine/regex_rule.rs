//! Pattern rule evaluation
//!
//! Patterns are matched against the whole password. Lookaround is supported,
//! as registry patterns rely on it (`(?=.*\d).+`, `^(?:(?!<USER_NAME>).)+$`).

use fancy_regex::Regex;
use std::borrow::Cow;

use crate::engine::error::RuleError;

/// Placeholder replaced by the resolved username before evaluation
pub const USER_NAME_PLACEHOLDER: &str = "<USER_NAME>";

/// Substitutes the escaped username for every placeholder in `pattern`
pub fn substitute_username<'a>(pattern: &'a str, username: &str) -> Cow<'a, str> {
    if pattern.contains(USER_NAME_PLACEHOLDER) {
        Cow::Owned(pattern.replace(USER_NAME_PLACEHOLDER, &regex::escape(username)))
    } else {
        Cow::Borrowed(pattern)
    }
}

/// Compiles `pattern` so that it must match the entire input
///
/// # Errors
///
/// Returns `RuleError::InvalidPattern` if the expression does not compile.
pub fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|e| RuleError::InvalidPattern(e.to_string()))
}

/// Whether the whole password matches the pattern
///
/// # Errors
///
/// Returns `RuleError` for a malformed pattern or when matching aborts.
pub fn evaluate(pattern: &str, password: &str) -> Result<bool, RuleError> {
    compile(pattern)?
        .is_match(password)
        .map_err(|e| RuleError::PatternEvaluation(e.to_string()))
}
