//! Mapping-level gate run once before any row is checked.

use thiserror::Error;

use crm_model::{FieldMapping, TargetEntity};

/// A mapping set that cannot be imported at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Map a column to the contact email field; email identifies each contact")]
    MissingContactEmail,
    #[error("Columns are mapped to the account but none is mapped to the account name field")]
    MissingAccountName,
}

/// Checks that the mapping identifies contacts and, when account columns are
/// present, accounts.
pub fn check_required_mappings(mappings: &[FieldMapping]) -> Result<(), ConfigError> {
    if !mappings
        .iter()
        .any(|m| m.targets(TargetEntity::Contact, "email"))
    {
        return Err(ConfigError::MissingContactEmail);
    }
    let uses_account = mappings
        .iter()
        .any(|m| m.target_entity() == Some(TargetEntity::Account));
    if uses_account
        && !mappings
            .iter()
            .any(|m| m.targets(TargetEntity::Account, "name"))
    {
        return Err(ConfigError::MissingAccountName);
    }
    Ok(())
}
