//! Runtime configuration.

use crate::validation::{validate_secret_name, validate_table_name};
use crate::{InventoryError, Result};

/// Environment variable naming the inventory table.
pub const ENV_TABLE: &str = "SUBSCRIPTION_TABLE";
/// Environment variable naming the credential bundle secret.
pub const ENV_SECRET: &str = "AZURE_SECRET_NAME";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ENDPOINT: &str = "AWS_ENDPOINT_URL";
pub const ENV_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";
pub const ENV_MANAGEMENT_ENDPOINT: &str = "AZURE_MANAGEMENT_ENDPOINT";
pub const ENV_FAIL_ON_EMPTY: &str = "FAIL_ON_EMPTY_INVENTORY";

const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// What to do when a tenant's listing leaves the collected list empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInventoryPolicy {
    /// Carry on and return an empty list.
    #[default]
    Ignore,
    /// Abort with [`InventoryError::NoSubscriptions`].
    Fail,
}

/// Configuration for an inventory run.
///
/// ```
/// use subinventory::{Config, EmptyInventoryPolicy};
///
/// let config = Config::new("subscription-inventory", "inventory/azure")
///     .with_region("eu-west-1")
///     .with_empty_inventory(EmptyInventoryPolicy::Fail);
///
/// assert_eq!(config.table_name, "subscription-inventory");
/// assert_eq!(config.region.as_deref(), Some("eu-west-1"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table receiving subscription records
    pub table_name: String,

    /// Secrets Manager secret holding the credential bundle
    pub secret_name: String,

    /// AWS region override (default: SDK credential chain)
    pub region: Option<String>,

    /// Custom AWS endpoint URL (for LocalStack testing)
    pub endpoint_url: Option<String>,

    /// Azure AD authority used for token requests
    pub authority_host: String,

    /// Azure Resource Manager base URL
    pub management_endpoint: String,

    /// Behavior when nothing queryable has been collected
    pub empty_inventory: EmptyInventoryPolicy,
}

impl Config {
    /// Creates a configuration with default endpoints.
    pub fn new(table_name: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            secret_name: secret_name.into(),
            region: None,
            endpoint_url: None,
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            management_endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            empty_inventory: EmptyInventoryPolicy::default(),
        }
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Config`] if a required variable is missing
    /// or a value is malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| InventoryError::Config(format!("{} is not set", key)))
        };

        let mut config = Self::new(required(ENV_TABLE)?, required(ENV_SECRET)?);
        config.region = lookup(ENV_REGION).filter(|v| !v.is_empty());
        config.endpoint_url = lookup(ENV_ENDPOINT).filter(|v| !v.is_empty());

        if let Some(host) = lookup(ENV_AUTHORITY_HOST).filter(|v| !v.is_empty()) {
            config.authority_host = host;
        }
        if let Some(endpoint) = lookup(ENV_MANAGEMENT_ENDPOINT).filter(|v| !v.is_empty()) {
            config.management_endpoint = endpoint;
        }

        if let Some(flag) = lookup(ENV_FAIL_ON_EMPTY) {
            config.empty_inventory = match flag.trim().to_ascii_lowercase().as_str() {
                "" | "0" | "false" | "no" => EmptyInventoryPolicy::Ignore,
                "1" | "true" | "yes" => EmptyInventoryPolicy::Fail,
                other => {
                    return Err(InventoryError::Config(format!(
                        "{} must be a boolean, got {:?}",
                        ENV_FAIL_ON_EMPTY, other
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks table and secret names.
    pub fn validate(&self) -> Result<()> {
        validate_table_name(&self.table_name)?;
        validate_secret_name(&self.secret_name)
    }

    /// Sets the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets a custom AWS endpoint (e.g. `http://localhost:4566`).
    pub fn with_endpoint_url(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint.into());
        self
    }

    /// Sets the Azure AD authority host.
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = host.into();
        self
    }

    /// Sets the Azure Resource Manager endpoint.
    pub fn with_management_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.management_endpoint = endpoint.into();
        self
    }

    /// Sets the empty-inventory policy.
    pub fn with_empty_inventory(mut self, policy: EmptyInventoryPolicy) -> Self {
        self.empty_inventory = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup(&[
            (ENV_TABLE, "subscription-inventory"),
            (ENV_SECRET, "inventory/azure"),
        ]))
        .unwrap();

        assert_eq!(config.table_name, "subscription-inventory");
        assert_eq!(config.secret_name, "inventory/azure");
        assert_eq!(config.region, None);
        assert_eq!(config.authority_host, "https://login.microsoftonline.com");
        assert_eq!(config.management_endpoint, "https://management.azure.com");
        assert_eq!(config.empty_inventory, EmptyInventoryPolicy::Ignore);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ENV_TABLE, "subs"),
            (ENV_SECRET, "creds"),
            (ENV_REGION, "us-west-2"),
            (ENV_ENDPOINT, "http://localhost:4566"),
            (ENV_MANAGEMENT_ENDPOINT, "https://management.usgovcloudapi.net"),
            (ENV_FAIL_ON_EMPTY, "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.management_endpoint, "https://management.usgovcloudapi.net");
        assert_eq!(config.empty_inventory, EmptyInventoryPolicy::Fail);
    }

    #[test]
    fn test_missing_table() {
        let err = Config::from_lookup(lookup(&[(ENV_SECRET, "creds")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TABLE));
    }

    #[test]
    fn test_bad_flag() {
        let err = Config::from_lookup(lookup(&[
            (ENV_TABLE, "subs"),
            (ENV_SECRET, "creds"),
            (ENV_FAIL_ON_EMPTY, "sometimes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, InventoryError::Config(_)));
    }

    #[test]
    fn test_invalid_table_name() {
        let err = Config::from_lookup(lookup(&[(ENV_TABLE, "my table"), (ENV_SECRET, "creds")]))
            .unwrap_err();
        assert!(matches!(err, InventoryError::Invalid { kind: "table name", .. }));
    }

    #[test]
    fn test_secret_arn_accepted() {
        let arn = "arn:aws:secretsmanager:us-east-1:123456789012:secret:inventory/azure-AbCdEf";
        let config = Config::from_lookup(lookup(&[(ENV_TABLE, "subs"), (ENV_SECRET, arn)])).unwrap();
        assert_eq!(config.secret_name, arn);

        let err = Config::from_lookup(lookup(&[
            (ENV_TABLE, "subs"),
            (ENV_SECRET, "arn:aws:ssm:us-east-1:123456789012:parameter/azure"),
        ]))
        .unwrap_err();
        assert!(matches!(err, InventoryError::Invalid { kind: "secret name", .. }));
    }
}
