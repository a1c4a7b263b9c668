//! Rules module
//!
//! Rule model, the registry the engine reads rules from, and the
//! `/tenant/rules` HTTP endpoints of the embedded registry.

pub mod defaults;
pub mod error;
pub mod handlers;
pub mod model;
pub mod registry;
pub mod remote;
pub mod routes;

pub use model::{Rule, RuleCollection, RuleKind, RuleState, Strength};
pub use registry::{InMemoryRuleRegistry, RuleQuery, RuleRegistry};
