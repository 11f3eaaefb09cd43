//! Mapping edits given on the command line.
//!
//! ```text
//! --set "Company=account.name"
//! --skip "Notes"
//! --create-field "Lead Score=contact:lead_score:Lead Score:number"
//! ```
//!
//! Edits run after auto-mapping and any saved profile: assignments first,
//! then skips, then field creations.

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crm_map::{EntityChoice, FieldSelection, MappingEditor};
use crm_model::{CrmBackend, FieldType, TargetEntity};

/// `COLUMN=entity.field`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub column: String,
    pub entity: TargetEntity,
    pub field: String,
}

impl FromStr for FieldAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, target) = split_column(s)?;
        let (entity, field) = target
            .split_once('.')
            .ok_or_else(|| format!("expected ENTITY.FIELD after '=', got '{target}'"))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(format!("missing field name in '{s}'"));
        }
        Ok(Self {
            column,
            entity: entity.parse()?,
            field: field.to_string(),
        })
    }
}

/// `COLUMN=entity:key:label[:type]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCreation {
    pub column: String,
    pub entity: TargetEntity,
    pub key: String,
    pub label: String,
    pub field_type: FieldType,
}

impl FromStr for FieldCreation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, definition) = split_column(s)?;
        let parts: Vec<&str> = definition.split(':').collect();
        let (entity, key, label, field_type) = match parts.as_slice() {
            [entity, key, label] => (*entity, *key, *label, FieldType::default()),
            [entity, key, label, field_type] => (*entity, *key, *label, field_type.parse()?),
            _ => {
                return Err(format!(
                    "expected ENTITY:KEY:LABEL[:TYPE] after '=', got '{definition}'"
                ));
            }
        };
        Ok(Self {
            column,
            entity: entity.parse()?,
            key: key.trim().to_string(),
            label: label.trim().to_string(),
            field_type,
        })
    }
}

/// Splits at the last `=` so column names may contain one.
fn split_column(s: &str) -> Result<(String, &str), String> {
    let (column, rest) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected COLUMN=..., got '{s}'"))?;
    if column.is_empty() {
        return Err(format!("missing column name in '{s}'"));
    }
    Ok((column.to_string(), rest))
}

#[derive(Debug, Clone, Default)]
pub struct MappingEdits {
    pub assignments: Vec<FieldAssignment>,
    pub skips: Vec<String>,
    pub creations: Vec<FieldCreation>,
}

impl MappingEdits {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.skips.is_empty() && self.creations.is_empty()
    }

    /// Applies every edit. Field creation needs `backend`; the first failing
    /// edit stops the rest.
    pub fn apply<B: CrmBackend>(
        &self,
        editor: &mut MappingEditor,
        backend: Option<&B>,
    ) -> Result<()> {
        for assignment in &self.assignments {
            editor
                .set_entity(&assignment.column, EntityChoice::Entity(assignment.entity))
                .and_then(|()| {
                    editor.set_field(
                        &assignment.column,
                        FieldSelection::Field(assignment.field.clone()),
                    )
                })
                .with_context(|| format!("--set for column '{}'", assignment.column))?;
            debug!(
                column = %assignment.column,
                entity = %assignment.entity,
                field = %assignment.field,
                "mapping set"
            );
        }

        for column in &self.skips {
            editor
                .set_entity(column, EntityChoice::Skip)
                .with_context(|| format!("--skip for column '{column}'"))?;
        }

        if self.creations.is_empty() {
            return Ok(());
        }
        let Some(backend) = backend else {
            bail!("--create-field needs the CRM API; remove --offline");
        };
        for creation in &self.creations {
            editor
                .set_entity(&creation.column, EntityChoice::Entity(creation.entity))
                .and_then(|()| editor.set_field(&creation.column, FieldSelection::CreateNew))
                .with_context(|| format!("--create-field for column '{}'", creation.column))?;
            editor
                .create_custom_field(
                    backend,
                    &creation.key,
                    &creation.label,
                    creation.field_type,
                )
                .with_context(|| {
                    format!(
                        "Could not create field '{}' for column '{}'",
                        creation.key, creation.column
                    )
                })?;
        }
        Ok(())
    }
}
