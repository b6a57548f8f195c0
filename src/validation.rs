//! Input validation for configuration values and credential fields.
//!
//! Everything here runs before the first network call so that a bad
//! deployment fails with a precise message instead of a provider error.

use crate::{InventoryError, Result};

/// DynamoDB table names are 3 to 255 characters.
const TABLE_NAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=255;

/// Secrets Manager names are at most 512 characters.
const MAX_SECRET_NAME_LENGTH: usize = 512;

/// Characters Secrets Manager accepts besides ASCII alphanumerics.
const SECRET_NAME_PUNCTUATION: &str = "/_+=.@-";

/// Upper bound for credential fields.
const MAX_CREDENTIAL_FIELD_LENGTH: usize = 1024;

/// Validates a DynamoDB table name.
///
/// # Errors
///
/// Returns [`InventoryError::Invalid`] if the name is outside 3..=255
/// characters or contains anything other than `[A-Za-z0-9_.-]`.
///
/// # Example
///
/// ```
/// use subinventory::validation::validate_table_name;
///
/// assert!(validate_table_name("subscription-inventory").is_ok());
/// assert!(validate_table_name("prod.subs_v2").is_ok());
///
/// assert!(validate_table_name("ab").is_err());
/// assert!(validate_table_name("subs table").is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<()> {
    if !TABLE_NAME_LENGTH.contains(&name.len()) {
        return Err(InventoryError::invalid(
            "table name",
            format!(
                "length must be between {} and {} characters",
                TABLE_NAME_LENGTH.start(),
                TABLE_NAME_LENGTH.end()
            ),
        ));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(InventoryError::invalid(
            "table name",
            format!("character {:?} not allowed (use A-Z, a-z, 0-9, _, -, .)", c),
        ));
    }

    Ok(())
}

/// Validates a Secrets Manager secret reference: a plain name or a full
/// `arn:<partition>:secretsmanager:<region>:<account>:secret:<name>` ARN.
///
/// # Example
///
/// ```
/// use subinventory::validation::validate_secret_name;
///
/// assert!(validate_secret_name("inventory/azure").is_ok());
/// assert!(validate_secret_name(
///     "arn:aws:secretsmanager:us-east-1:123456789012:secret:inventory/azure-AbCdEf"
/// )
/// .is_ok());
///
/// assert!(validate_secret_name("arn:aws:s3:::bucket").is_err());
/// ```
pub fn validate_secret_name(reference: &str) -> Result<()> {
    match reference.strip_prefix("arn:") {
        Some(rest) => validate_secret_arn(rest),
        None => validate_plain_secret_name(reference),
    }
}

fn validate_secret_arn(rest: &str) -> Result<()> {
    let parts: Vec<&str> = rest.splitn(6, ':').collect();
    let malformed = || {
        InventoryError::invalid(
            "secret name",
            "expected arn:<partition>:secretsmanager:<region>:<account>:secret:<name>",
        )
    };

    let [partition, service, region, account, resource, name] = parts.as_slice() else {
        return Err(malformed());
    };

    if partition.is_empty()
        || *service != "secretsmanager"
        || region.is_empty()
        || account.len() != 12
        || !account.chars().all(|c| c.is_ascii_digit())
        || *resource != "secret"
    {
        return Err(malformed());
    }

    validate_plain_secret_name(name)
}

fn validate_plain_secret_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(InventoryError::invalid("secret name", "name cannot be empty"));
    }

    if name.len() > MAX_SECRET_NAME_LENGTH {
        return Err(InventoryError::invalid(
            "secret name",
            format!(
                "name exceeds maximum length of {} characters",
                MAX_SECRET_NAME_LENGTH
            ),
        ));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || SECRET_NAME_PUNCTUATION.contains(*c)))
    {
        return Err(InventoryError::invalid(
            "secret name",
            format!("character {:?} not allowed", c),
        ));
    }

    Ok(())
}

/// Validates one field of a tenant credential.
///
/// `kind` names the field in the error (e.g. `"tenant_id"`).
pub fn validate_credential_field(kind: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(InventoryError::invalid(kind, "value cannot be empty"));
    }

    if value.len() > MAX_CREDENTIAL_FIELD_LENGTH {
        return Err(InventoryError::invalid(
            kind,
            format!(
                "value exceeds maximum length of {} characters",
                MAX_CREDENTIAL_FIELD_LENGTH
            ),
        ));
    }

    if value.chars().any(char::is_control) {
        return Err(InventoryError::invalid(kind, "value contains control characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_table_names() {
        assert!(validate_table_name("subs").is_ok());
        assert!(validate_table_name("Subscription_Inventory").is_ok());
        assert!(validate_table_name("inventory-subs.prod").is_ok());
    }

    #[test]
    fn test_table_name_length() {
        let result = validate_table_name("ab");
        assert!(result.unwrap_err().to_string().contains("between 3 and 255"));

        assert!(validate_table_name(&"a".repeat(255)).is_ok());
        assert!(validate_table_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_table_name_characters() {
        for name in ["subs/table", "subs table", "subs:prod", "subs$"] {
            let result = validate_table_name(name);
            assert!(result.is_err(), "Expected '{}' to fail validation", name);
            assert!(result.unwrap_err().to_string().contains("not allowed"));
        }
    }

    #[test]
    fn test_secret_names() {
        assert!(validate_secret_name("inventory/azure-creds").is_ok());
        assert!(validate_secret_name("azure+creds=prod@v1").is_ok());

        assert!(validate_secret_name("").is_err());
        assert!(validate_secret_name("azure creds").is_err());
        assert!(validate_secret_name(&"a".repeat(513)).is_err());
    }

    #[test]
    fn test_secret_arns() {
        assert!(validate_secret_name(
            "arn:aws:secretsmanager:us-east-1:123456789012:secret:inventory/azure-AbCdEf"
        )
        .is_ok());
        assert!(validate_secret_name(
            "arn:aws-us-gov:secretsmanager:us-gov-west-1:123456789012:secret:azure-creds-x1Y2z3"
        )
        .is_ok());

        let rejected = [
            "arn:aws:ssm:us-east-1:123456789012:parameter/azure",
            "arn:aws:secretsmanager:us-east-1:1234:secret:azure",
            "arn:aws:secretsmanager:us-east-1:123456789012:secret:",
            "arn:aws:secretsmanager:us-east-1:123456789012:secret:azure creds",
            "arn:aws:secretsmanager",
        ];
        for arn in rejected {
            assert!(validate_secret_name(arn).is_err(), "Expected '{}' to fail validation", arn);
        }
    }

    #[test]
    fn test_credential_fields() {
        assert!(validate_credential_field("tenant_id", "72f988bf-86f1-41af-91ab-2d7cd011db47").is_ok());

        let result = validate_credential_field("application_id", "  ");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("application_id"));
        assert!(message.contains("empty"));

        let result = validate_credential_field("key", "abc\ndef");
        assert!(result.unwrap_err().to_string().contains("control"));
    }
}
