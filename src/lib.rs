//! Password Validator Service
//!
//! A multi-tenant password validation engine built with Actix-web. Each tenant
//! owns an ordered set of rules, evaluated either as local patterns or by
//! delegating to external rule modules, and combined into a single verdict.

pub mod app;
pub mod config;
pub mod engine;
pub mod health;
pub mod mocks;
pub mod password;
pub mod rules;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use engine::{TenantContext, ValidationEngine, Verdict};
pub use rules::{Rule, RuleRegistry};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "password-validator";
