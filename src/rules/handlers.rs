//! Rule registry API handlers
//!
//! `/tenant/rules` endpoints of the embedded registry. All of them are
//! scoped to the tenant named in the `x-okapi-tenant` header.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::rules::error::RegistryError;
use crate::rules::model::Rule;
use crate::rules::registry::{InMemoryRuleRegistry, RuleQuery, DEFAULT_LIST_LIMIT};
use crate::utils::request_context::tenant_context;

/// Query string of `GET /tenant/rules`
#[derive(Debug, Default, Deserialize)]
pub struct RuleListQuery {
    pub query: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl From<RuleListQuery> for RuleQuery {
    fn from(params: RuleListQuery) -> Self {
        Self {
            filter: params.query.filter(|query| !query.trim().is_empty()),
            limit: params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
            offset: params.offset.unwrap_or(0),
        }
    }
}

fn tenant_of(req: &HttpRequest) -> Result<String, RegistryError> {
    tenant_context(req).map(|context| context.tenant).ok_or(RegistryError::MissingTenant)
}

/// List the tenant's rules
pub async fn list_rules(
    registry: web::Data<InMemoryRuleRegistry>,
    req: HttpRequest,
    params: web::Query<RuleListQuery>,
) -> Result<HttpResponse, RegistryError> {
    let tenant = tenant_of(&req)?;
    let collection = registry.list_rules(&tenant, &params.into_inner().into())?;
    Ok(HttpResponse::Ok().json(collection))
}

/// Create a rule
pub async fn create_rule(
    registry: web::Data<InMemoryRuleRegistry>,
    req: HttpRequest,
    payload: web::Json<Rule>,
) -> Result<HttpResponse, RegistryError> {
    let tenant = tenant_of(&req)?;
    let created = registry.create_rule(&tenant, payload.into_inner())?;
    Ok(HttpResponse::Created().json(created))
}

/// Replace a rule, matched on its `ruleId`
pub async fn update_rule(
    registry: web::Data<InMemoryRuleRegistry>,
    req: HttpRequest,
    payload: web::Json<Rule>,
) -> Result<HttpResponse, RegistryError> {
    let tenant = tenant_of(&req)?;
    let updated = registry.update_rule(&tenant, payload.into_inner())?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Get a rule by id
pub async fn get_rule(
    registry: web::Data<InMemoryRuleRegistry>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, RegistryError> {
    let tenant = tenant_of(&req)?;
    let rule = registry.get_rule(&tenant, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query: RuleQuery = RuleListQuery::default().into();
        assert_eq!(query, RuleQuery::default());
    }

    #[test]
    fn test_blank_filter_is_ignored() {
        let query: RuleQuery = RuleListQuery {
            query: Some("  ".to_string()),
            limit: Some(50),
            offset: Some(5),
        }
        .into();
        assert_eq!(query.filter, None);
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 5);
    }
}
