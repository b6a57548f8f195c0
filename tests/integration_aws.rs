//! AWS collaborator integration tests using LocalStack.
//!
//! These tests require LocalStack to be running on localhost:4566.
//!
//! Run with:
//!   docker run -d -p 4566:4566 localstack/localstack
//!   cargo test --test integration_aws --features aws,mock -- --ignored
//!
//! Or run in CI where LocalStack is configured as a service.

#![cfg(all(feature = "aws", feature = "mock"))]

use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType,
};
use serde_json::json;
use std::sync::Arc;
use subinventory::backends::aws::{load_sdk_config, DynamoTable, SecretsManagerStore};
use subinventory::backends::mock::MockDirectory;
use subinventory::{Collector, Config, SecretStore, Subscription};

fn localstack_config(table: &str, secret: &str) -> Config {
    let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4566".to_string());

    Config::new(table, secret)
        .with_region("us-east-1")
        .with_endpoint_url(endpoint)
}

async fn setup(table: &str, secret: &str, bundle: Option<&str>) -> aws_config::SdkConfig {
    std::env::set_var("AWS_ACCESS_KEY_ID", "test");
    std::env::set_var("AWS_SECRET_ACCESS_KEY", "test");

    let sdk_config = load_sdk_config(&localstack_config(table, secret)).await;

    let dynamo = aws_sdk_dynamodb::Client::new(&sdk_config);
    dynamo.delete_table().table_name(table).send().await.ok();
    dynamo
        .create_table()
        .table_name(table)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("subscription_id")
                .key_type(KeyType::Hash)
                .build()
                .expect("key schema"),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("subscription_id")
                .attribute_type(ScalarAttributeType::S)
                .build()
                .expect("attribute definition"),
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .expect("Failed to create table");

    let secrets = aws_sdk_secretsmanager::Client::new(&sdk_config);
    secrets
        .delete_secret()
        .secret_id(secret)
        .force_delete_without_recovery(true)
        .send()
        .await
        .ok();
    if let Some(bundle) = bundle {
        secrets
            .create_secret()
            .name(secret)
            .secret_string(bundle)
            .send()
            .await
            .expect("Failed to create secret");
    }

    sdk_config
}

#[tokio::test]
#[ignore] // Run only when LocalStack is available
async fn test_inventory_run_against_localstack() {
    let table = "inventory-it-run";
    let secret = "inventory-it/azure";
    let bundle = r#"{"corp": {"application_id": "app", "key": "k", "tenant_id": "t-1"}}"#;
    let sdk_config = setup(table, secret, Some(bundle)).await;

    let directory = MockDirectory::new();
    directory
        .set_subscriptions(
            "t-1",
            vec![
                Subscription::new("sub-ad", "Access to Azure Active Directory"),
                Subscription::new("sub-prod", "Prod"),
            ],
        )
        .await;

    let collector = Collector::new(
        localstack_config(table, secret),
        Arc::new(SecretsManagerStore::new(&sdk_config)),
        Arc::new(directory),
        Arc::new(DynamoTable::new(&sdk_config, table)),
    );

    let event = collector.handle(json!({})).await.expect("run failed");
    assert_eq!(event["subscription_list"], json!(["sub-prod"]));

    let dynamo = aws_sdk_dynamodb::Client::new(&sdk_config);
    let item = dynamo
        .get_item()
        .table_name(table)
        .key("subscription_id", AttributeValue::S("sub-ad".to_string()))
        .send()
        .await
        .expect("get_item failed")
        .item
        .expect("record missing");

    assert_eq!(item["queryable"], AttributeValue::S("false".to_string()));
    assert_eq!(item["tenant_name"], AttributeValue::S("corp".to_string()));
    assert!(matches!(item["SubscriptionClass"], AttributeValue::M(_)));
}

#[tokio::test]
#[ignore]
async fn test_missing_secret_is_none() {
    let secret = "inventory-it/absent";
    let sdk_config = setup("inventory-it-absent", secret, None).await;

    let store = SecretsManagerStore::new(&sdk_config);
    let value = store.get_secret_string(secret).await.expect("lookup failed");

    assert!(value.is_none());
}
