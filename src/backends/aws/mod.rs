//! AWS-backed collaborators: Secrets Manager for the credential bundle and
//! DynamoDB for the inventory table.
//!
//! # Requirements
//!
//! - AWS credentials configured via:
//!   - Environment variables (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)
//!   - Shared credentials file (`~/.aws/credentials`)
//!   - The Lambda execution role
//!
//! # Example
//!
//! ```no_run
//! use subinventory::backends::aws::{load_sdk_config, DynamoTable, SecretsManagerStore};
//! use subinventory::Config;
//!
//! #[tokio::main]
//! async fn main() -> subinventory::Result<()> {
//!     let config = Config::from_env()?;
//!     let sdk_config = load_sdk_config(&config).await;
//!
//!     let secrets = SecretsManagerStore::new(&sdk_config);
//!     let table = DynamoTable::new(&sdk_config, &config.table_name);
//!     Ok(())
//! }
//! ```

mod dynamodb;
mod secrets;

pub use dynamodb::{to_attribute_value, DynamoTable};
pub use secrets::SecretsManagerStore;

use crate::Config;

/// Loads the shared SDK configuration, honoring region and endpoint
/// overrides.
pub async fn load_sdk_config(config: &Config) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(ref region) = config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }

    // Custom endpoint for LocalStack testing
    if let Some(ref endpoint) = config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}
