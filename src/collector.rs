//! The inventory run: credentials in, queryable subscription IDs out.

use crate::backend::{Directory, SecretStore, Table};
use crate::config::{Config, EmptyInventoryPolicy};
use crate::credentials::{load_credentials, TenantCredential};
use crate::subscription::SubscriptionRecord;
use crate::table::{upsert_subscription, UpsertOutcome};
use crate::{InventoryError, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, Instrument, Span};

/// Field added to the invocation event.
pub const SUBSCRIPTION_LIST_FIELD: &str = "subscription_list";

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySummary {
    /// Queryable subscription IDs in collection order
    pub subscription_list: Vec<String>,
    /// Records written to the table
    pub written: usize,
    /// Records skipped for missing fields
    pub skipped: usize,
}

/// Collects subscriptions from every tenant and upserts them into the table.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use subinventory::backends::mock::{MockDirectory, MockSecretStore, MockTable};
/// use subinventory::{Collector, Config, Subscription};
///
/// #[tokio::main]
/// async fn main() -> subinventory::Result<()> {
///     let secrets = MockSecretStore::new();
///     secrets
///         .set_secret(
///             "azure-creds",
///             r#"{"corp": {"application_id": "app", "key": "k", "tenant_id": "t-1"}}"#,
///         )
///         .await;
///
///     let directory = MockDirectory::new();
///     directory.set_subscriptions("t-1", vec![Subscription::new("sub-1", "Prod")]).await;
///
///     let collector = Collector::new(
///         Config::new("subscriptions", "azure-creds"),
///         Arc::new(secrets),
///         Arc::new(directory),
///         Arc::new(MockTable::new("subscriptions")),
///     );
///
///     let event = collector.handle(serde_json::json!({"source": "schedule"})).await?;
///     assert_eq!(event["subscription_list"], serde_json::json!(["sub-1"]));
///     assert_eq!(event["source"], "schedule");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Collector {
    config: Config,
    secrets: Arc<dyn SecretStore>,
    directory: Arc<dyn Directory>,
    table: Arc<dyn Table>,
    span: Span,
}

impl Collector {
    pub fn new(
        config: Config,
        secrets: Arc<dyn SecretStore>,
        directory: Arc<dyn Directory>,
        table: Arc<dyn Table>,
    ) -> Self {
        Self {
            config,
            secrets,
            directory,
            table,
            span: Span::none(),
        }
    }

    /// Runs all work under `span` (e.g. one carrying the request ID).
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Handles one invocation.
    ///
    /// Returns `event` with [`SUBSCRIPTION_LIST_FIELD`] set to the queryable
    /// subscription IDs; all other fields are kept.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidEvent`]: `event` is not a JSON object
    /// - [`InventoryError::NoCredentials`]: the secret is absent or empty;
    ///   nothing is written
    /// - [`InventoryError::AccountUpdate`]: a table write failed; records
    ///   written before it stay written
    pub async fn handle(&self, event: Value) -> Result<Value> {
        self.handle_inner(event).instrument(self.span.clone()).await
    }

    async fn handle_inner(&self, event: Value) -> Result<Value> {
        info!("Received event: {}", sorted_keys(&event));

        let Value::Object(mut event) = event else {
            return Err(InventoryError::InvalidEvent(format!(
                "expected a JSON object, got {}",
                event
            )));
        };

        let credentials = load_credentials(&*self.secrets, &self.config.secret_name)
            .await?
            .ok_or(InventoryError::NoCredentials)?;

        let summary = self.collect(&credentials).await?;
        info!(
            tenants = credentials.len(),
            written = summary.written,
            skipped = summary.skipped,
            queryable = summary.subscription_list.len(),
            "inventory complete"
        );

        event.insert(
            SUBSCRIPTION_LIST_FIELD.to_string(),
            Value::from(summary.subscription_list),
        );
        Ok(Value::Object(event))
    }

    /// Lists and upserts every subscription of every tenant, in order.
    pub async fn collect(&self, credentials: &[TenantCredential]) -> Result<InventorySummary> {
        let mut summary = InventorySummary::default();

        for credential in credentials {
            let subscriptions = self
                .directory
                .list_subscriptions(credential)
                .await
                .map_err(|e| InventoryError::directory(&credential.tenant, e))?;

            tracing::debug!(
                directory = self.directory.name(),
                tenant = %credential.tenant,
                count = subscriptions.len(),
                "listed subscriptions"
            );

            for subscription in &subscriptions {
                let record = SubscriptionRecord::new(subscription, credential);

                match upsert_subscription(&*self.table, &record).await? {
                    UpsertOutcome::Written => summary.written += 1,
                    UpsertOutcome::Skipped { .. } => summary.skipped += 1,
                }

                if record.queryable {
                    summary.subscription_list.push(record.subscription_id);
                }
            }

            if self.config.empty_inventory == EmptyInventoryPolicy::Fail
                && summary.subscription_list.is_empty()
            {
                return Err(InventoryError::NoSubscriptions {
                    tenant: credential.tenant.clone(),
                });
            }
        }

        Ok(summary)
    }
}

/// Copies `value` with object keys in sorted order, for stable log lines.
fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let sorted: Map<String, Value> = keys
                .into_iter()
                .map(|key| (key.clone(), sorted_keys(&map[key])))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::backends::mock::{MockDirectory, MockSecretStore, MockTable};
    use crate::Subscription;
    use serde_json::json;

    const BUNDLE: &str = r#"{"corp": {"application_id": "app", "key": "k", "tenant_id": "t-1"}}"#;

    async fn collector_with(
        subscriptions: Vec<Subscription>,
        policy: EmptyInventoryPolicy,
    ) -> (Collector, Arc<MockTable>) {
        let secrets = MockSecretStore::new();
        secrets.set_secret("azure-creds", BUNDLE).await;

        let directory = MockDirectory::new();
        directory.set_subscriptions("t-1", subscriptions).await;

        let table = Arc::new(MockTable::new("subscriptions"));
        let config = Config::new("subscriptions", "azure-creds").with_empty_inventory(policy);
        let collector = Collector::new(config, Arc::new(secrets), Arc::new(directory), table.clone());
        (collector, table)
    }

    #[test]
    fn test_sorted_keys() {
        let value = json!({"b": 1, "a": {"d": 2, "c": 3}});
        assert_eq!(sorted_keys(&value).to_string(), r#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[tokio::test]
    async fn test_non_object_event_rejected() {
        let (collector, table) = collector_with(vec![], EmptyInventoryPolicy::Ignore).await;
        let err = collector.handle(json!(["not", "an", "object"])).await.unwrap_err();

        assert!(matches!(err, InventoryError::InvalidEvent(_)));
        assert!(table.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_tenant_ignored_by_default() {
        let (collector, _table) = collector_with(vec![], EmptyInventoryPolicy::Ignore).await;
        let event = collector.handle(json!({})).await.unwrap();

        assert_eq!(event[SUBSCRIPTION_LIST_FIELD], json!([]));
    }

    #[tokio::test]
    async fn test_empty_tenant_fails_when_requested() {
        let (collector, _table) = collector_with(vec![], EmptyInventoryPolicy::Fail).await;
        let err = collector.handle(json!({})).await.unwrap_err();

        assert!(matches!(err, InventoryError::NoSubscriptions { ref tenant } if tenant == "corp"));
    }

    #[tokio::test]
    async fn test_only_directory_only_subscriptions_counts_as_empty() {
        let subs = vec![Subscription::new("sub-ad", "Access to Azure Active Directory")];
        let (collector, table) = collector_with(subs, EmptyInventoryPolicy::Fail).await;

        let err = collector.handle(json!({})).await.unwrap_err();
        assert!(matches!(err, InventoryError::NoSubscriptions { .. }));
        // the record is still written before the check
        assert_eq!(table.len().await, 1);
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let subs = vec![
            Subscription::new("sub-1", "Prod"),
            Subscription::new("sub-2", "Dev").with_state(None),
        ];
        let (collector, _table) = collector_with(subs, EmptyInventoryPolicy::Ignore).await;
        let creds = vec![TenantCredential::new("corp", "t-1", "app", "k")];

        let summary = collector.collect(&creds).await.unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.subscription_list, vec!["sub-1", "sub-2"]);
    }
}
