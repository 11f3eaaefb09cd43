//! Custom field definitions owned by the CRM settings service.

use serde::{Deserialize, Serialize};

use crate::entity::{FieldType, TargetEntity};

/// Prefix that keeps custom field keys apart from base field keys.
pub const CUSTOM_FIELD_PREFIX: &str = "custom_";

/// A user-defined field, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldDefinition {
    pub entity_type: TargetEntity,
    /// Unique per entity.
    pub field_key: String,
    pub display_label: String,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub is_required: bool,
}

fn default_active() -> bool {
    true
}

impl CustomFieldDefinition {
    /// Catalog key for this field (`custom_<key>`).
    pub fn catalog_key(&self) -> String {
        format!("{CUSTOM_FIELD_PREFIX}{}", self.field_key)
    }
}

/// Request body for creating a custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomField {
    pub entity_type: TargetEntity,
    pub field_key: String,
    pub display_label: String,
    pub field_type: FieldType,
    pub active: bool,
}

impl NewCustomField {
    pub fn new(
        entity_type: TargetEntity,
        field_key: impl Into<String>,
        display_label: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            entity_type,
            field_key: field_key.into(),
            display_label: display_label.into(),
            field_type,
            active: true,
        }
    }
}

/// Splits a catalog key into its custom field key, if it is one.
pub fn custom_field_key(catalog_key: &str) -> Option<&str> {
    catalog_key
        .strip_prefix(CUSTOM_FIELD_PREFIX)
        .filter(|key| !key.is_empty())
}
