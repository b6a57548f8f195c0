//! Subinventory - Azure subscription inventory collector.
//!
//! Lists the subscriptions visible to a set of Azure service principals,
//! one per tenant, and upserts a record for each into a key-value table.
//! The IDs of subscriptions that can be queried for resources are returned
//! on the invocation event for a downstream notification step.
//!
//! # Flow
//!
//! 1. Load the credential bundle from the [`SecretStore`]
//! 2. For each tenant, list subscriptions through the [`Directory`]
//! 3. For each subscription, derive the queryable flag and upsert a
//!    [`SubscriptionRecord`] into the [`Table`]
//! 4. Attach the queryable IDs to the event as `subscription_list`
//!
//! Everything runs sequentially. Any table write failure aborts the run;
//! records missing a field are logged and skipped.
//!
//! # Quick Start
//!
//! Requires the `aws` and `azure` features.
//!
//! ```ignore
//! use std::sync::Arc;
//! use subinventory::backends::aws::{load_sdk_config, DynamoTable, SecretsManagerStore};
//! use subinventory::backends::azure::ArmDirectory;
//! use subinventory::{Collector, Config};
//!
//! #[tokio::main]
//! async fn main() -> subinventory::Result<()> {
//!     subinventory::logging::init();
//!
//!     let config = Config::from_env()?;
//!     let sdk_config = load_sdk_config(&config).await;
//!
//!     let collector = Collector::new(
//!         config.clone(),
//!         Arc::new(SecretsManagerStore::new(&sdk_config)),
//!         Arc::new(ArmDirectory::new(&config)?),
//!         Arc::new(DynamoTable::new(&sdk_config, &config.table_name)),
//!     );
//!
//!     let event = collector.handle(serde_json::json!({})).await?;
//!     println!("{}", event["subscription_list"]);
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Provides |
//! |---------|----------|
//! | `mock` (default) | In-memory secret store, directory and table |
//! | `aws` | Secrets Manager store and DynamoDB table |
//! | `azure` | Azure Resource Manager directory |
//! | `lambda` | The `inventory-subs` Lambda binary |

pub mod backend;
pub mod backends;
pub mod collector;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod subscription;
pub mod table;
pub mod validation;

pub use backend::{Directory, SecretStore, Table};
pub use collector::{Collector, InventorySummary};
pub use config::{Config, EmptyInventoryPolicy};
pub use credentials::TenantCredential;
pub use error::{InventoryError, Result};
pub use subscription::{Subscription, SubscriptionRecord};
pub use table::UpsertOutcome;
