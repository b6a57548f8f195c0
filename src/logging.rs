//! Process-wide log setup.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Default filter: our own events at info, SDK chatter at warn.
pub const DEFAULT_FILTER: &str = "info,aws_config=warn,aws_smithy_runtime=warn,\
aws_sdk_dynamodb=warn,aws_sdk_secretsmanager=warn,azure_core=warn,azure_identity=warn,\
hyper=warn,reqwest=warn";

/// Installs the global subscriber.
///
/// `RUST_LOG` replaces [`DEFAULT_FILTER`] when set. Safe to call more than
/// once; only the first call has any effect. If another subscriber is
/// already installed the failure goes to stderr, since there is no
/// subscriber of ours to log it through.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        if let Err(e) = install(filter) {
            eprintln!("subinventory: failed to install log subscriber: {}", e);
        }
    });
}

fn install(filter: EnvFilter) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    // CloudWatch stamps each line itself.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .without_time()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        tracing::info!("logging initialized");
    }

    #[test]
    fn test_second_install_reports_failure() {
        init();
        let result = install(EnvFilter::new(DEFAULT_FILTER));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
