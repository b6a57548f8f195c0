//! Subscription objects returned by the directory and the records persisted
//! for them.

use crate::credentials::TenantCredential;
use crate::{InventoryError, Result};
use serde_json::Value;
use std::fmt;

/// Display-name fragment that marks directory-only pseudo-subscriptions.
///
/// The directory lists these alongside real subscriptions, but they cannot be
/// queried for resources.
pub const DIRECTORY_ONLY_MARKER: &str = "Access to Azure Active Directory";

/// Returns whether a subscription with this display name can be queried for
/// resources.
///
/// A missing display name cannot contain the marker, so it is queryable.
///
/// ```
/// use subinventory::subscription::is_queryable;
///
/// assert!(is_queryable(Some("Prod")));
/// assert!(!is_queryable(Some("Access to Azure Active Directory")));
/// assert!(is_queryable(None));
/// ```
pub fn is_queryable(display_name: Option<&str>) -> bool {
    !display_name.is_some_and(|name| name.contains(DIRECTORY_ONLY_MARKER))
}

/// A subscription as listed by the directory service.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    /// Stable subscription identifier
    pub subscription_id: String,

    /// Human-readable name
    pub display_name: Option<String>,

    /// Provider lifecycle state (Enabled, Disabled, Warned, ...)
    pub state: Option<String>,

    /// Full object as returned by the provider
    pub raw: Value,
}

impl Subscription {
    /// Creates an enabled subscription with a synthesized snapshot.
    pub fn new(subscription_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let subscription_id = subscription_id.into();
        let display_name = display_name.into();
        let raw = serde_json::json!({
            "id": format!("/subscriptions/{}", subscription_id),
            "subscriptionId": subscription_id,
            "displayName": display_name,
            "state": "Enabled",
        });

        Self {
            subscription_id,
            display_name: Some(display_name),
            state: Some("Enabled".to_string()),
            raw,
        }
    }

    /// Overrides the lifecycle state.
    pub fn with_state(mut self, state: Option<&str>) -> Self {
        self.state = state.map(str::to_string);
        match (&mut self.raw, state) {
            (Value::Object(map), Some(state)) => {
                map.insert("state".to_string(), Value::String(state.to_string()));
            }
            (Value::Object(map), None) => {
                map.remove("state");
            }
            _ => {}
        }
        self
    }

    /// Builds a subscription from an Azure Resource Manager JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Invalid`] if `subscriptionId` is absent.
    pub fn from_arm(raw: Value) -> Result<Self> {
        let field = |name: &str| raw.get(name).and_then(Value::as_str).map(str::to_string);

        let subscription_id = field("subscriptionId").ok_or_else(|| {
            InventoryError::invalid("subscription", format!("missing subscriptionId in {}", raw))
        })?;

        Ok(Self {
            subscription_id,
            display_name: field("displayName"),
            state: field("state"),
            raw,
        })
    }
}

/// The persisted inventory entry for one subscription.
///
/// Keyed by `subscription_id`; every other field is overwritten on each run.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRecord {
    pub subscription_id: String,
    pub display_name: Option<String>,
    pub state: Option<String>,
    /// Opaque snapshot of the provider object
    pub snapshot: Value,
    pub tenant_id: String,
    pub tenant_name: String,
    pub queryable: bool,
}

impl SubscriptionRecord {
    /// Builds the record for `subscription` owned by `tenant`.
    pub fn new(subscription: &Subscription, tenant: &TenantCredential) -> Self {
        Self {
            subscription_id: subscription.subscription_id.clone(),
            display_name: subscription.display_name.clone(),
            state: subscription.state.clone(),
            snapshot: subscription.raw.clone(),
            tenant_id: tenant.tenant_id.clone(),
            tenant_name: tenant.tenant.clone(),
            queryable: is_queryable(subscription.display_name.as_deref()),
        }
    }

    /// The queryable flag as stored in the table.
    pub fn queryable_attr(&self) -> &'static str {
        if self.queryable {
            "true"
        } else {
            "false"
        }
    }

    /// Names the first expected field this record lacks, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.display_name.is_none() {
            Some("display_name")
        } else if self.state.is_none() {
            Some("state")
        } else {
            None
        }
    }
}

impl fmt::Display for SubscriptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{subscription_id: {}, display_name: {}, state: {}, SubscriptionClass: {}, tenant_id: {}, tenant_name: {}, queryable: {}}}",
            self.subscription_id,
            self.display_name.as_deref().unwrap_or("<none>"),
            self.state.as_deref().unwrap_or("<none>"),
            self.snapshot,
            self.tenant_id,
            self.tenant_name,
            self.queryable_attr()
        )
    }
}
