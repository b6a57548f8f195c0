//! Lambda entry point for the subscription inventory.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use subinventory::backends::aws::{load_sdk_config, DynamoTable, SecretsManagerStore};
use subinventory::backends::azure::ArmDirectory;
use subinventory::{Collector, Config};

#[tokio::main]
async fn main() -> Result<(), Error> {
    subinventory::logging::init();

    let config = Config::from_env()?;
    let sdk_config = load_sdk_config(&config).await;

    let collector = Collector::new(
        config.clone(),
        Arc::new(SecretsManagerStore::new(&sdk_config)),
        Arc::new(ArmDirectory::new(&config)?),
        Arc::new(DynamoTable::new(&sdk_config, &config.table_name)),
    );

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        let LambdaEvent { payload, context } = event;
        let span = tracing::info_span!("inventory", request_id = %context.request_id);
        let collector = collector.clone().with_span(span);
        async move { collector.handle(payload).await.map_err(Error::from) }
    }))
    .await
}
