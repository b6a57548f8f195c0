//! Error types for inventory operations.

use crate::subscription::SubscriptionRecord;
use thiserror::Error;

/// Result type alias using [`InventoryError`].
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Errors that can occur during an inventory run.
///
/// Every variant is fatal to the run. Records that are merely missing a field
/// are not errors; see [`UpsertOutcome`](crate::table::UpsertOutcome).
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The secret store returned nothing usable.
    #[error("Unable to extract Azure Credentials. Aborting...")]
    NoCredentials,

    /// The credential bundle did not have the expected shape.
    #[error("invalid credential bundle: {0}")]
    InvalidCredentials(String),

    /// No queryable subscriptions were collected (only raised when
    /// [`EmptyInventoryPolicy::Fail`](crate::config::EmptyInventoryPolicy::Fail) is set).
    #[error("No Subscriptions found for tenant {tenant}. Aborting...")]
    NoSubscriptions {
        /// Tenant label whose listing left the accumulator empty
        tenant: String,
    },

    /// The table rejected a write.
    #[error("Unable to create {record}: {source}")]
    AccountUpdate {
        /// Record that failed to persist
        record: Box<SubscriptionRecord>,
        /// Underlying store error
        #[source]
        source: Box<InventoryError>,
    },

    /// Listing subscriptions for a tenant failed.
    #[error("directory: list subscriptions for tenant {tenant}: {source}")]
    Directory {
        /// Tenant label
        tenant: String,
        /// Underlying error
        #[source]
        source: Box<InventoryError>,
    },

    /// Reading from the secret store failed.
    #[error("secret store: get {secret}: {source}")]
    SecretStore {
        /// Secret name
        secret: String,
        /// Underlying error
        #[source]
        source: Box<InventoryError>,
    },

    /// The key-value store reported an error.
    #[error("table {table}: {message}")]
    Store {
        /// Table name
        table: String,
        /// Provider error message
        message: String,
    },

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A name or identifier failed validation.
    #[error("invalid {kind}: {reason}")]
    Invalid {
        /// What was being validated (table name, tenant_id, ...)
        kind: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The invocation event was not a JSON object.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InventoryError {
    /// Wraps a store error with the record that failed to persist.
    ///
    /// # Example
    ///
    /// ```
    /// use subinventory::{InventoryError, Subscription, SubscriptionRecord, TenantCredential};
    ///
    /// let tenant = TenantCredential::new("corp", "tenant-1", "app-1", "secret");
    /// let record = SubscriptionRecord::new(&Subscription::new("sub-1", "Prod"), &tenant);
    /// let err = InventoryError::account_update(
    ///     record,
    ///     InventoryError::Store {
    ///         table: "subscriptions".to_string(),
    ///         message: "throttled".to_string(),
    ///     },
    /// );
    ///
    /// assert!(err.to_string().starts_with("Unable to create"));
    /// assert!(err.to_string().contains("sub-1"));
    /// ```
    pub fn account_update(record: SubscriptionRecord, err: InventoryError) -> Self {
        Self::AccountUpdate {
            record: Box::new(record),
            source: Box::new(err),
        }
    }

    /// Wraps an error raised while listing a tenant's subscriptions.
    pub fn directory(tenant: impl Into<String>, err: InventoryError) -> Self {
        Self::Directory {
            tenant: tenant.into(),
            source: Box::new(err),
        }
    }

    /// Wraps an error raised while reading a secret.
    pub fn secret_store(secret: impl Into<String>, err: InventoryError) -> Self {
        Self::SecretStore {
            secret: secret.into(),
            source: Box::new(err),
        }
    }

    /// Shorthand for a validation failure.
    pub fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            reason: reason.into(),
        }
    }
}
