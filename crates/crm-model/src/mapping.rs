//! Column mapping types for CSV-header-to-field mapping.
//!
//! A [`FieldMapping`] ties one CSV header to an optional target. The target
//! carries the entity and, once chosen, the canonical field key, so a field
//! without an entity cannot be expressed.

use serde::{Deserialize, Serialize};

use crate::entity::TargetEntity;

/// Entity and (optionally) field a CSV column is mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingTarget {
    pub entity: TargetEntity,
    /// Canonical field key; `None` while the entity is chosen but the field is not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Mapping of one CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    /// Source header, unique within a mapping set.
    pub csv_column: String,
    /// `None` means the column is skipped.
    #[serde(default)]
    pub target: Option<MappingTarget>,
}

impl FieldMapping {
    /// A column that is not imported.
    pub fn unmapped(csv_column: impl Into<String>) -> Self {
        Self {
            csv_column: csv_column.into(),
            target: None,
        }
    }

    /// A column mapped to a concrete entity field.
    pub fn mapped(
        csv_column: impl Into<String>,
        entity: TargetEntity,
        field: impl Into<String>,
    ) -> Self {
        Self {
            csv_column: csv_column.into(),
            target: Some(MappingTarget {
                entity,
                field: Some(field.into()),
            }),
        }
    }

    pub fn target_entity(&self) -> Option<TargetEntity> {
        self.target.as_ref().map(|t| t.entity)
    }

    pub fn target_field(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.field.as_deref())
    }

    /// Returns true when both entity and field are set.
    pub fn is_mapped(&self) -> bool {
        self.target_field().is_some()
    }

    /// Returns true when this column targets `entity.field`.
    pub fn targets(&self, entity: TargetEntity, field: &str) -> bool {
        self.target_entity() == Some(entity) && self.target_field() == Some(field)
    }

    /// Key of this column's value in a flat mapped record
    /// (`email`, `account_name`, `custom_region`, `account_custom_tier`).
    pub fn record_key(&self) -> Option<String> {
        let target = self.target.as_ref()?;
        let field = target.field.as_deref()?;
        Some(format!("{}{}", target.entity.record_prefix(), field))
    }
}

/// One selectable field of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldCatalogEntry {
    /// Canonical key.
    pub value: String,
    /// Display name.
    pub label: String,
}

impl FieldCatalogEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}
