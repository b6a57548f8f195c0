//! Service-principal credentials and the secret bundle that carries them.
//!
//! The bundle is a JSON object keyed by tenant label:
//!
//! ```json
//! {
//!   "corp": { "application_id": "...", "key": "...", "tenant_id": "..." },
//!   "lab":  { "application_id": "...", "key": "...", "tenant_id": "..." }
//! }
//! ```
//!
//! Tenants are processed in the order they appear in the bundle.

use crate::backend::SecretStore;
use crate::validation::validate_credential_field;
use crate::{InventoryError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Service-principal identity for one tenant.
#[derive(Clone, PartialEq, Eq)]
pub struct TenantCredential {
    /// Label the bundle uses for this tenant
    pub tenant: String,
    pub tenant_id: String,
    pub application_id: String,
    /// Client secret
    pub key: String,
}

impl TenantCredential {
    pub fn new(
        tenant: impl Into<String>,
        tenant_id: impl Into<String>,
        application_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            tenant_id: tenant_id.into(),
            application_id: application_id.into(),
            key: key.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        validate_credential_field("tenant_id", &self.tenant_id)?;
        validate_credential_field("application_id", &self.application_id)?;
        validate_credential_field("key", &self.key)
    }
}

impl fmt::Debug for TenantCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantCredential")
            .field("tenant", &self.tenant)
            .field("tenant_id", &self.tenant_id)
            .field("application_id", &self.application_id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Wire shape of one bundle entry.
#[derive(Deserialize)]
struct CredentialInfo {
    application_id: String,
    key: String,
    tenant_id: String,
}

/// Parses a credential bundle, preserving tenant order.
///
/// # Errors
///
/// Returns [`InventoryError::InvalidCredentials`] if the payload is not a
/// JSON object of `{application_id, key, tenant_id}` entries, and
/// [`InventoryError::Invalid`] if a field is empty or malformed.
///
/// # Example
///
/// ```
/// use subinventory::credentials::parse_bundle;
///
/// let bundle = r#"{"corp": {"application_id": "app", "key": "s3cret", "tenant_id": "t-1"}}"#;
/// let creds = parse_bundle(bundle).unwrap();
///
/// assert_eq!(creds[0].tenant, "corp");
/// assert_eq!(creds[0].tenant_id, "t-1");
/// ```
pub fn parse_bundle(payload: &str) -> Result<Vec<TenantCredential>> {
    let entries: Map<String, Value> = serde_json::from_str(payload).map_err(|e| {
        InventoryError::InvalidCredentials(format!("expected an object keyed by tenant: {}", e))
    })?;

    entries
        .into_iter()
        .map(|(tenant, value)| {
            let info: CredentialInfo = serde_json::from_value(value).map_err(|e| {
                InventoryError::InvalidCredentials(format!("tenant {}: {}", tenant, e))
            })?;

            let credential = TenantCredential {
                tenant,
                tenant_id: info.tenant_id,
                application_id: info.application_id,
                key: info.key,
            };
            credential.validate()?;
            Ok(credential)
        })
        .collect()
}

/// Loads and parses the credential bundle stored under `secret_name`.
///
/// Returns `Ok(None)` when the store has no such secret or the bundle holds
/// no tenants.
pub async fn load_credentials(
    store: &dyn SecretStore,
    secret_name: &str,
) -> Result<Option<Vec<TenantCredential>>> {
    let payload = store
        .get_secret_string(secret_name)
        .await
        .map_err(|e| InventoryError::secret_store(secret_name, e))?;

    let Some(payload) = payload else {
        tracing::warn!(store = store.name(), secret = secret_name, "credential secret not found");
        return Ok(None);
    };

    let credentials = parse_bundle(&payload)?;
    if credentials.is_empty() {
        return Ok(None);
    }

    tracing::debug!(
        store = store.name(),
        secret = secret_name,
        tenants = credentials.len(),
        "loaded credential bundle"
    );
    Ok(Some(credentials))
}
