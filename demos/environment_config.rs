//! Environment-based configuration example.
//!
//! Reads the same variables the Lambda does and runs one inventory pass
//! against the in-memory collaborators, so it works without cloud access.
//!
//! Run with:
//!   SUBSCRIPTION_TABLE=subscription-inventory AZURE_SECRET_NAME=inventory/azure \
//!     cargo run --example environment_config
//!
//! Environment variables:
//! - SUBSCRIPTION_TABLE: Inventory table name (required)
//! - AZURE_SECRET_NAME: Credential bundle secret name (required)
//! - AWS_REGION, AWS_ENDPOINT_URL: AWS overrides
//! - FAIL_ON_EMPTY_INVENTORY: Abort when nothing queryable is found
//! - RUST_LOG: Log filter (default: info, SDKs at warn)

use std::sync::Arc;
use subinventory::backends::mock::{MockDirectory, MockSecretStore, MockTable};
use subinventory::{Collector, Config, Subscription};

#[tokio::main]
async fn main() -> subinventory::Result<()> {
    subinventory::logging::init();

    let config = Config::from_env()?;
    println!("Table:   {}", config.table_name);
    println!("Secret:  {}", config.secret_name);
    println!("Region:  {}", config.region.as_deref().unwrap_or("<sdk default>"));
    println!("Empty inventory policy: {:?}", config.empty_inventory);

    let secrets = MockSecretStore::new();
    secrets
        .set_secret(
            &config.secret_name,
            r#"{"demo": {"application_id": "app-id", "key": "client-secret", "tenant_id": "demo-tenant"}}"#,
        )
        .await;

    let directory = MockDirectory::new();
    directory
        .set_subscriptions(
            "demo-tenant",
            vec![
                Subscription::new("00000000-0000-0000-0000-000000000001", "Access to Azure Active Directory"),
                Subscription::new("00000000-0000-0000-0000-000000000002", "Production"),
            ],
        )
        .await;

    let table = Arc::new(MockTable::new(&config.table_name));
    let collector = Collector::new(config, Arc::new(secrets), Arc::new(directory), table.clone());

    let event = collector.handle(serde_json::json!({"source": "demo"})).await?;

    println!("\nReturned event: {}", event);
    println!("Records written: {}", table.len().await);
    Ok(())
}
