//! DynamoDB inventory table.

use crate::backend::Table;
use crate::table::ItemUpdate;
use crate::{InventoryError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::Value;

/// Writes subscription records with `UpdateItem`.
pub struct DynamoTable {
    client: Client,
    table_name: String,
}

impl DynamoTable {
    pub fn new(sdk_config: &aws_config::SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(sdk_config),
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl Table for DynamoTable {
    fn name(&self) -> &str {
        &self.table_name
    }

    async fn update_item(&self, update: &ItemUpdate) -> Result<()> {
        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(&update.key_attribute, AttributeValue::S(update.key.clone()))
            .update_expression(update.update_expression());

        for set in &update.sets {
            request = request.expression_attribute_values(&set.placeholder, to_attribute_value(&set.value));
        }

        request.send().await.map_err(|e| InventoryError::Store {
            table: self.table_name.clone(),
            message: DisplayErrorContext(&e).to_string(),
        })?;

        Ok(())
    }
}

/// Maps a JSON value onto the DynamoDB type system.
///
/// Objects become maps, arrays become lists, and numbers keep their textual
/// form.
pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute_value).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute_value(v)))
                .collect(),
        ),
    }
}
