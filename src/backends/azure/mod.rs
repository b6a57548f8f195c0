//! Azure directory backend.
//!
//! Each tenant credential is exchanged for an Azure Resource Manager token
//! with `azure_identity`'s client-secret flow, then `GET /subscriptions` is
//! paged until `nextLink` runs out.
//!
//! # Example
//!
//! ```no_run
//! use subinventory::backends::azure::ArmDirectory;
//! use subinventory::{Config, Directory, TenantCredential};
//!
//! #[tokio::main]
//! async fn main() -> subinventory::Result<()> {
//!     let directory = ArmDirectory::new(&Config::new("subs", "creds"))?;
//!     let credential = TenantCredential::new("corp", "tenant-id", "app-id", "client-secret");
//!
//!     for sub in directory.list_subscriptions(&credential).await? {
//!         println!("{} {:?}", sub.subscription_id, sub.display_name);
//!     }
//!     Ok(())
//! }
//! ```

mod arm;

pub use arm::ArmDirectory;
