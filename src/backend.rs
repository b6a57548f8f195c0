//! Collaborator traits for the inventory run.
//!
//! The collector talks to three external systems: a secret store holding the
//! credential bundle, a directory service listing subscriptions, and a
//! key-value table receiving one upsert per subscription. Each is a trait so
//! that SDK-backed implementations ([`backends::aws`](crate::backends),
//! [`backends::azure`](crate::backends)) and the in-memory mocks are
//! interchangeable.

use crate::credentials::TenantCredential;
use crate::subscription::Subscription;
use crate::table::ItemUpdate;
use crate::Result;
use async_trait::async_trait;

/// Source of the credential bundle.
///
/// # Example
///
/// ```
/// use subinventory::backends::mock::MockSecretStore;
/// use subinventory::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> subinventory::Result<()> {
///     let store = MockSecretStore::new();
///     store.set_secret("azure-creds", "{}").await;
///
///     assert_eq!(store.get_secret_string("azure-creds").await?.as_deref(), Some("{}"));
///     assert!(store.get_secret_string("other").await?.is_none());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the store name (e.g., "secretsmanager", "mock").
    fn name(&self) -> &str;

    /// Fetches the string value of a secret.
    ///
    /// Returns `Ok(None)` if the secret does not exist or has no string
    /// value.
    async fn get_secret_string(&self, name: &str) -> Result<Option<String>>;
}

/// Directory service that lists the subscriptions visible to a tenant
/// credential.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Returns the directory name (e.g., "arm", "mock").
    fn name(&self) -> &str;

    /// Lists every subscription the credential can see, in provider order.
    ///
    /// Implementations follow provider paging until the listing is complete.
    async fn list_subscriptions(&self, credential: &TenantCredential) -> Result<Vec<Subscription>>;
}

/// Key-value table that accepts partial updates by primary key.
#[async_trait]
pub trait Table: Send + Sync {
    /// Returns the table name.
    fn name(&self) -> &str;

    /// Applies `update`, creating the item if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Store`](crate::InventoryError::Store) when the
    /// provider rejects the write (throttling, malformed item, ...).
    async fn update_item(&self, update: &ItemUpdate) -> Result<()>;
}
