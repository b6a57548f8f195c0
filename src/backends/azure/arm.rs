//! Subscription listing through Azure Resource Manager.

use crate::backend::Directory;
use crate::{Config, InventoryError, Result, Subscription, TenantCredential};
use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use azure_core::Url;
use azure_identity::ClientSecretCredential;
use serde::Deserialize;
use serde_json::Value;

/// ARM API version for `GET /subscriptions`.
const API_VERSION: &str = "2020-01-01";

/// One page of the subscription listing.
#[derive(Debug, Deserialize)]
struct SubscriptionPage {
    #[serde(default)]
    value: Vec<Value>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

/// Lists subscriptions with a client-secret credential per tenant.
pub struct ArmDirectory {
    http: reqwest::Client,
    authority_host: Url,
    management_endpoint: String,
}

impl ArmDirectory {
    /// Creates a directory client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Config`] if the authority host is not a URL.
    pub fn new(config: &Config) -> Result<Self> {
        let authority_host = Url::parse(&config.authority_host).map_err(|e| {
            InventoryError::Config(format!(
                "invalid authority host {}: {}",
                config.authority_host, e
            ))
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            authority_host,
            management_endpoint: config.management_endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn scope(&self) -> String {
        format!("{}/.default", self.management_endpoint)
    }

    fn first_page_url(&self) -> String {
        format!(
            "{}/subscriptions?api-version={}",
            self.management_endpoint, API_VERSION
        )
    }

    async fn access_token(&self, credential: &TenantCredential) -> Result<String> {
        let client_credential = ClientSecretCredential::new(
            azure_core::new_http_client(),
            self.authority_host.clone(),
            credential.tenant_id.clone(),
            credential.application_id.clone(),
            credential.key.clone(),
        );

        let scope = self.scope();
        let token = client_credential
            .get_token(&[scope.as_str()])
            .await
            .map_err(|e| {
                InventoryError::Other(anyhow::anyhow!(
                    "Failed to acquire token for tenant {}: {}",
                    credential.tenant_id,
                    e
                ))
            })?;

        Ok(token.token.secret().to_string())
    }

    /// Pages through `GET /subscriptions` until `nextLink` runs out.
    async fn list_with_token(&self, token: &str) -> Result<Vec<Subscription>> {
        let mut subscriptions = Vec::new();
        let mut next = Some(self.first_page_url());

        while let Some(url) = next {
            let page = self.fetch_page(&url, token).await?;
            for raw in page.value {
                subscriptions.push(Subscription::from_arm(raw)?);
            }
            next = page.next_link;
        }

        Ok(subscriptions)
    }

    async fn fetch_page(&self, url: &str, token: &str) -> Result<SubscriptionPage> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| InventoryError::Other(anyhow::anyhow!("ARM request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InventoryError::Other(anyhow::anyhow!(
                "ARM returned {}: {}",
                status,
                body
            )));
        }

        response
            .json::<SubscriptionPage>()
            .await
            .map_err(|e| InventoryError::Other(anyhow::anyhow!("Invalid ARM response: {}", e)))
    }
}

#[async_trait]
impl Directory for ArmDirectory {
    fn name(&self) -> &str {
        "arm"
    }

    async fn list_subscriptions(&self, credential: &TenantCredential) -> Result<Vec<Subscription>> {
        let token = self.access_token(credential).await?;
        self.list_with_token(&token).await
    }
}
