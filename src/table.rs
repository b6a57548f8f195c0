//! Upserting subscription records into the inventory table.

use crate::backend::Table;
use crate::subscription::SubscriptionRecord;
use crate::{InventoryError, Result};
use serde_json::Value;
use tracing::{error, info};

/// Primary key attribute of the inventory table.
pub const KEY_ATTRIBUTE: &str = "subscription_id";

/// One `attribute = :placeholder` assignment in an update expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSet {
    pub attribute: String,
    pub placeholder: String,
    pub value: Value,
}

impl AttributeSet {
    fn new(attribute: &str, placeholder: &str, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.to_string(),
            placeholder: placeholder.to_string(),
            value: value.into(),
        }
    }
}

/// A partial update addressed by primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    /// Name of the key attribute
    pub key_attribute: String,
    /// Key value
    pub key: String,
    /// Assignments, applied unconditionally
    pub sets: Vec<AttributeSet>,
}

impl ItemUpdate {
    /// Builds the update for a record.
    ///
    /// Returns the name of the first missing field if the record is
    /// incomplete.
    pub fn for_record(record: &SubscriptionRecord) -> std::result::Result<Self, &'static str> {
        let (Some(display_name), Some(state)) = (&record.display_name, &record.state) else {
            return Err(record.missing_field().unwrap_or("display_name"));
        };

        Ok(Self {
            key_attribute: KEY_ATTRIBUTE.to_string(),
            key: record.subscription_id.clone(),
            sets: vec![
                AttributeSet::new("display_name", ":name", display_name.as_str()),
                AttributeSet::new("subscription_state", ":status", state.as_str()),
                AttributeSet::new("SubscriptionClass", ":class_record", record.snapshot.clone()),
                AttributeSet::new("tenant_id", ":tenant_id", record.tenant_id.as_str()),
                AttributeSet::new("tenant_name", ":tenant_name", record.tenant_name.as_str()),
                AttributeSet::new("queryable", ":queryable", record.queryable_attr()),
            ],
        })
    }

    /// Renders the `set a=:a, b=:b` expression.
    ///
    /// ```
    /// use subinventory::table::{AttributeSet, ItemUpdate};
    ///
    /// let update = ItemUpdate {
    ///     key_attribute: "subscription_id".to_string(),
    ///     key: "sub-1".to_string(),
    ///     sets: vec![AttributeSet {
    ///         attribute: "display_name".to_string(),
    ///         placeholder: ":name".to_string(),
    ///         value: "Prod".into(),
    ///     }],
    /// };
    /// assert_eq!(update.update_expression(), "set display_name=:name");
    /// ```
    pub fn update_expression(&self) -> String {
        let assignments: Vec<String> = self
            .sets
            .iter()
            .map(|set| format!("{}={}", set.attribute, set.placeholder))
            .collect();
        format!("set {}", assignments.join(", "))
    }
}

/// Non-fatal result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The record was written.
    Written,
    /// The record lacked an expected field and was not written.
    Skipped {
        /// Name of the missing field
        missing: &'static str,
    },
}

/// Upserts `record` into `table`, keyed by subscription ID.
///
/// Incomplete records are logged at critical severity and skipped; the caller
/// keeps going. Store failures are fatal.
///
/// # Errors
///
/// Returns [`InventoryError::AccountUpdate`] carrying the record and the
/// store error if the write is rejected.
pub async fn upsert_subscription(
    table: &dyn Table,
    record: &SubscriptionRecord,
) -> Result<UpsertOutcome> {
    info!(table = table.name(), "Adding subscription {}", record);

    let update = match ItemUpdate::for_record(record) {
        Ok(update) => update,
        Err(missing) => {
            error!(
                severity = "critical",
                table = table.name(),
                subscription_id = %record.subscription_id,
                missing,
                "Subscription {} is missing a key: {}",
                record,
                missing
            );
            return Ok(UpsertOutcome::Skipped { missing });
        }
    };

    table
        .update_item(&update)
        .await
        .map_err(|e| {
            error!(
                table = table.name(),
                subscription_id = %record.subscription_id,
                "table write rejected"
            );
            InventoryError::account_update(record.clone(), e)
        })?;

    Ok(UpsertOutcome::Written)
}
