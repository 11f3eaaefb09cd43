//! Error types for mapping operations.

use std::fmt;

use crm_model::TargetEntity;

/// Errors from mapping editor operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Column not present in the loaded header row.
    ColumnNotFound(String),
    /// A field was chosen before the column's entity.
    EntityNotSelected(String),
    /// Field key not in the entity's catalog.
    FieldNotInCatalog { entity: TargetEntity, field: String },
    /// `create_custom_field` called without a pending creation.
    NoPendingCreation,
    /// Custom field key is empty or contains unsupported characters.
    InvalidFieldKey(String),
    /// The backend refused to create the field; message is the server's.
    CustomFieldRejected { message: String },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(c) => write!(f, "Column not found: {c}"),
            Self::EntityNotSelected(c) => {
                write!(f, "Choose contact or account for '{c}' before picking a field")
            }
            Self::FieldNotInCatalog { entity, field } => {
                write!(f, "Field '{field}' is not a known {entity} field")
            }
            Self::NoPendingCreation => write!(f, "No field creation is in progress"),
            Self::InvalidFieldKey(key) => write!(
                f,
                "Invalid field key '{key}': use letters, digits and underscores"
            ),
            Self::CustomFieldRejected { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for MappingError {}
