//! In-memory collaborators for testing.
//!
//! Each mock keeps its state behind a `tokio` lock and exposes public error
//! fields that, when set, make the corresponding operation fail.

use crate::backend::{Directory, SecretStore, Table};
use crate::table::ItemUpdate;
use crate::*;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Secret store backed by a map.
#[derive(Default)]
pub struct MockSecretStore {
    secrets: RwLock<HashMap<String, String>>,

    /// Error to return from `get_secret_string()`
    pub get_error: Option<InventoryError>,
}

impl MockSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a secret value.
    pub async fn set_secret(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut secrets = self.secrets.write().await;
        secrets.insert(name.into(), value.into());
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_secret_string(&self, name: &str) -> Result<Option<String>> {
        if let Some(ref err) = self.get_error {
            return Err(InventoryError::Other(anyhow::anyhow!("{}", err)));
        }

        let secrets = self.secrets.read().await;
        Ok(secrets.get(name).cloned())
    }
}

/// Directory keyed by tenant ID.
#[derive(Default)]
pub struct MockDirectory {
    tenants: RwLock<HashMap<String, Vec<Subscription>>>,
    listed: RwLock<Vec<String>>,

    /// Error to return from `list_subscriptions()`
    pub list_error: Option<InventoryError>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subscriptions visible to `tenant_id`.
    pub async fn set_subscriptions(&self, tenant_id: impl Into<String>, subs: Vec<Subscription>) {
        let mut tenants = self.tenants.write().await;
        tenants.insert(tenant_id.into(), subs);
    }

    /// Tenant IDs listed so far, in call order.
    pub async fn listed(&self) -> Vec<String> {
        self.listed.read().await.clone()
    }
}

#[async_trait]
impl Directory for MockDirectory {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_subscriptions(&self, credential: &TenantCredential) -> Result<Vec<Subscription>> {
        self.listed.write().await.push(credential.tenant_id.clone());

        if let Some(ref err) = self.list_error {
            return Err(InventoryError::Other(anyhow::anyhow!("{}", err)));
        }

        let tenants = self.tenants.read().await;
        Ok(tenants.get(&credential.tenant_id).cloned().unwrap_or_default())
    }
}

/// Table that applies updates to in-memory items and records every call.
pub struct MockTable {
    name: String,
    items: RwLock<HashMap<String, Map<String, Value>>>,
    calls: RwLock<Vec<ItemUpdate>>,

    /// Error to return from every `update_item()`
    pub update_error: Option<InventoryError>,
    /// Fail only updates for this key
    pub fail_key: Option<String>,
}

impl MockTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
            update_error: None,
            fail_key: None,
        }
    }

    /// Returns a copy of the item stored under `key`.
    pub async fn item(&self, key: &str) -> Option<Map<String, Value>> {
        self.items.read().await.get(key).cloned()
    }

    /// Returns every stored item.
    pub async fn items(&self) -> HashMap<String, Map<String, Value>> {
        self.items.read().await.clone()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Updates received, in order, including failed ones.
    pub async fn calls(&self) -> Vec<ItemUpdate> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl Table for MockTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn update_item(&self, update: &ItemUpdate) -> Result<()> {
        self.calls.write().await.push(update.clone());

        if let Some(ref err) = self.update_error {
            return Err(InventoryError::Other(anyhow::anyhow!("{}", err)));
        }
        if self.fail_key.as_deref() == Some(update.key.as_str()) {
            return Err(InventoryError::Store {
                table: self.name.clone(),
                message: format!("rejected update for {}", update.key),
            });
        }

        let mut items = self.items.write().await;
        let item = items.entry(update.key.clone()).or_default();
        item.insert(update.key_attribute.clone(), Value::String(update.key.clone()));
        for set in &update.sets {
            item.insert(set.attribute.clone(), set.value.clone());
        }
        Ok(())
    }
}
