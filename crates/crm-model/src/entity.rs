//! Target entities and custom field value types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The CRM record kind a CSV column can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetEntity {
    Contact,
    Account,
}

impl TargetEntity {
    /// All entities, in catalog display order.
    pub const ALL: [TargetEntity; 2] = [TargetEntity::Contact, TargetEntity::Account];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetEntity::Contact => "contact",
            TargetEntity::Account => "account",
        }
    }

    /// Prefix used for this entity's keys in a flat mapped record.
    ///
    /// Contact keys are unprefixed, account keys carry `account_`.
    pub fn record_prefix(&self) -> &'static str {
        match self {
            TargetEntity::Contact => "",
            TargetEntity::Account => "account_",
        }
    }
}

impl fmt::Display for TargetEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contact" | "contacts" => Ok(TargetEntity::Contact),
            "account" | "accounts" | "company" => Ok(TargetEntity::Account),
            _ => Err(format!("Unknown entity: {s}")),
        }
    }
}

/// Value type of a user-defined custom field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        }
    }

    /// Example cell value used in generated templates.
    pub fn example_value(&self) -> &'static str {
        match self {
            FieldType::Text => "Sample text",
            FieldType::Number => "100",
            FieldType::Date => "2024-01-15",
            FieldType::Boolean => "true",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "string" => Ok(FieldType::Text),
            "number" | "numeric" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            _ => Err(format!("Unknown field type: {s}")),
        }
    }
}
