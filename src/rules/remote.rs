//! Rule registry reached over HTTP

use async_trait::async_trait;
use std::time::Duration;

use crate::engine::context::TenantContext;
use crate::rules::error::RegistryError;
use crate::rules::model::{Rule, RuleCollection};
use crate::rules::registry::RuleRegistry;
use crate::utils::request_context::join_url;

const RULES_PATH: &str = "/tenant/rules";
const MAX_RULES: &str = "1000";

/// Client for a remote registry serving `GET /tenant/rules`
#[derive(Debug, Clone)]
pub struct HttpRuleRegistry {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpRuleRegistry {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl RuleRegistry for HttpRuleRegistry {
    async fn list_enabled_rules(&self, context: &TenantContext) -> Result<Vec<Rule>, RegistryError> {
        let url = join_url(&self.base_url, RULES_PATH);
        let request = self
            .client
            .get(&url)
            .query(&[("query", "state=Enabled"), ("limit", MAX_RULES)])
            .timeout(self.timeout);

        let response = context
            .apply_headers(request)
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RegistryError::Unavailable(format!(
                "{url} responded with status {}",
                response.status().as_u16()
            )));
        }

        let collection: RuleCollection = response
            .json()
            .await
            .map_err(|e| RegistryError::Unavailable(format!("unreadable rule collection: {e}")))?;

        log::debug!(
            "Fetched {} rules for tenant {} from {url}",
            collection.rules.len(),
            context.tenant
        );
        Ok(collection.rules)
    }
}
