//! Wire payloads sent to the CRM backend.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::entity::TargetEntity;

/// Field values for one entity of an import record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPayload {
    /// Base field values keyed by canonical field key.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    /// Custom field values keyed by bare custom field key.
    #[serde(
        rename = "customFields",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub custom_fields: BTreeMap<String, String>,
}

impl EntityPayload {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.custom_fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// One row of a bulk upsert: a contact and, in unified imports, its account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub contact: EntityPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<EntityPayload>,
}

impl ImportRecord {
    /// Contact email, if present and non-blank.
    pub fn email(&self) -> Option<&str> {
        self.contact
            .get("email")
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Request asking the backend to make sure each key exists as a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRegisterRequest {
    pub entity_type: TargetEntity,
    pub field_keys: Vec<String>,
}

impl AutoRegisterRequest {
    pub fn new(entity_type: TargetEntity, keys: &BTreeSet<String>) -> Self {
        Self {
            entity_type,
            field_keys: keys.iter().cloned().collect(),
        }
    }
}
