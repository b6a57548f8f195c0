//! AWS Secrets Manager secret store.

use crate::backend::SecretStore;
use crate::{InventoryError, Result};
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;

/// Reads the credential bundle from AWS Secrets Manager.
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    fn name(&self) -> &str {
        "secretsmanager"
    }

    async fn get_secret_string(&self, name: &str) -> Result<Option<String>> {
        let response = match self.client.get_secret_value().secret_id(name).send().await {
            Ok(response) => response,
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception()) =>
            {
                return Ok(None);
            }
            Err(e) => {
                return Err(InventoryError::Other(anyhow::anyhow!(
                    "Failed to get secret value: {}",
                    DisplayErrorContext(&e)
                )))
            }
        };

        // Binary secrets carry no bundle.
        Ok(response.secret_string().map(str::to_string))
    }
}
