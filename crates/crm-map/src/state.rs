//! Mapping editor for interactive mapping workflows.
//!
//! The editor owns the ordered mappings produced by the auto-mapper together
//! with both field catalogs, and applies user overrides. It always holds
//! exactly one mapping per original CSV header, in original order.

use tracing::{debug, info, warn};

use crm_model::{
    CrmBackend, CustomFieldDefinition, FieldCatalogEntry, FieldMapping, FieldType,
    MappingTarget, NewCustomField, TargetEntity,
};

use crate::catalog::Catalogs;
use crate::engine::{AutoMapper, MatchSource};
use crate::error::MappingError;
use crate::repository::MappingProfile;

/// Entity choice for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityChoice {
    Entity(TargetEntity),
    /// Do not import this column.
    Skip,
}

/// Field choice for a column whose entity is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    Field(String),
    /// The catalog's "create new field" action.
    CreateNew,
}

/// What a field selection did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSelectionOutcome {
    Assigned,
    /// Control moves to custom field creation for this column.
    CreationRequested,
}

/// Where a column's current mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOrigin {
    Auto(MatchSource),
    Manual,
}

/// A custom field creation waiting for key, label and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFieldCreation {
    pub csv_column: String,
    pub entity: TargetEntity,
}

/// Result of re-applying a saved profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileApplication {
    /// Columns whose mapping was taken from the profile.
    pub applied: Vec<String>,
    /// Profile columns absent from this file.
    pub missing_columns: Vec<String>,
    /// `(column, field)` pairs whose field no longer exists in the catalog.
    pub unknown_fields: Vec<(String, String)>,
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    pub total: usize,
    /// Columns with both entity and field.
    pub mapped: usize,
    /// Columns that will not be imported.
    pub skipped: usize,
    /// Columns with an entity but no field yet.
    pub incomplete: usize,
    pub contact: usize,
    pub account: usize,
}

#[derive(Debug, Clone)]
pub struct MappingEditor {
    mappings: Vec<FieldMapping>,
    origins: Vec<MappingOrigin>,
    catalogs: Catalogs,
    pending: Option<PendingFieldCreation>,
    /// Definitions created through this editor, in creation order.
    created: Vec<CustomFieldDefinition>,
}

impl MappingEditor {
    /// Creates an editor by auto-mapping the given headers.
    pub fn new(headers: &[String], catalogs: Catalogs) -> Self {
        let result = AutoMapper::new(&catalogs).suggest(headers);
        let origins = result
            .suggestions
            .iter()
            .map(|s| MappingOrigin::Auto(s.source))
            .collect();
        let mappings = result.into_mappings();
        info!(
            columns = mappings.len(),
            mapped = mappings.iter().filter(|m| m.is_mapped()).count(),
            "auto-mapping complete"
        );
        Self {
            mappings,
            origins,
            catalogs,
            pending: None,
            created: Vec::new(),
        }
    }

    /// Creates an editor from an existing mapping set.
    pub fn from_mappings(mappings: Vec<FieldMapping>, catalogs: Catalogs) -> Self {
        let origins = vec![MappingOrigin::Manual; mappings.len()];
        Self {
            mappings,
            origins,
            catalogs,
            pending: None,
            created: Vec::new(),
        }
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// CSV headers in original order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.mappings.iter().map(|m| m.csv_column.as_str())
    }

    pub fn mapping(&self, column: &str) -> Option<&FieldMapping> {
        self.mappings.iter().find(|m| m.csv_column == column)
    }

    pub fn origin(&self, column: &str) -> Option<MappingOrigin> {
        self.position(column).ok().map(|idx| self.origins[idx])
    }

    /// Reassigns a column's entity. `Skip` clears entity and field.
    ///
    /// Changing to a different entity clears the field, since the old key
    /// belongs to the other catalog.
    pub fn set_entity(&mut self, column: &str, choice: EntityChoice) -> Result<(), MappingError> {
        let idx = self.position(column)?;
        let mapping = &mut self.mappings[idx];
        match choice {
            EntityChoice::Skip => mapping.target = None,
            EntityChoice::Entity(entity) => {
                if mapping.target_entity() != Some(entity) {
                    mapping.target = Some(MappingTarget {
                        entity,
                        field: None,
                    });
                }
            }
        }
        self.origins[idx] = MappingOrigin::Manual;
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.csv_column == column)
        {
            self.pending = None;
        }
        debug!(column, ?choice, "entity changed");
        Ok(())
    }

    /// Fields offered for a column: its entity's catalog, or nothing when skipped.
    pub fn field_options(&self, column: &str) -> Result<&[FieldCatalogEntry], MappingError> {
        let idx = self.position(column)?;
        Ok(match self.mappings[idx].target_entity() {
            Some(entity) => self.catalogs.get(entity).entries(),
            None => &[],
        })
    }

    /// Sets the field of a column whose entity is already chosen.
    pub fn set_field(
        &mut self,
        column: &str,
        selection: FieldSelection,
    ) -> Result<FieldSelectionOutcome, MappingError> {
        let idx = self.position(column)?;
        let entity = self.mappings[idx]
            .target_entity()
            .ok_or_else(|| MappingError::EntityNotSelected(column.to_string()))?;

        match selection {
            FieldSelection::CreateNew => {
                self.pending = Some(PendingFieldCreation {
                    csv_column: column.to_string(),
                    entity,
                });
                Ok(FieldSelectionOutcome::CreationRequested)
            }
            FieldSelection::Field(field) => {
                if !self.catalogs.get(entity).contains(&field) {
                    return Err(MappingError::FieldNotInCatalog { entity, field });
                }
                self.mappings[idx].target = Some(MappingTarget {
                    entity,
                    field: Some(field),
                });
                self.origins[idx] = MappingOrigin::Manual;
                Ok(FieldSelectionOutcome::Assigned)
            }
        }
    }

    /// Custom fields created while editing, for validating their columns.
    pub fn created_fields(&self) -> &[CustomFieldDefinition] {
        &self.created
    }

    pub fn pending_creation(&self) -> Option<&PendingFieldCreation> {
        self.pending.as_ref()
    }

    /// Abandons the pending creation; the column keeps its entity and no field.
    pub fn cancel_field_creation(&mut self) {
        self.pending = None;
    }

    /// Creates a custom field for the pending column and assigns it.
    ///
    /// On success the new entry is appended to the entity's catalog. When the
    /// backend refuses (duplicate key or any other non-success response) the
    /// server's message is returned verbatim and the creation stays pending.
    pub fn create_custom_field<B: CrmBackend>(
        &mut self,
        backend: &B,
        key: &str,
        label: &str,
        field_type: FieldType,
    ) -> Result<FieldCatalogEntry, MappingError> {
        let pending = self
            .pending
            .clone()
            .ok_or(MappingError::NoPendingCreation)?;
        let key = key.trim();
        if !is_valid_field_key(key) {
            return Err(MappingError::InvalidFieldKey(key.to_string()));
        }
        let label = if label.trim().is_empty() {
            key
        } else {
            label.trim()
        };

        let request = NewCustomField::new(pending.entity, key, label, field_type);
        let definition = backend.create_custom_field(&request).map_err(|error| {
            warn!(
                column = %pending.csv_column,
                entity = %pending.entity,
                key,
                error = %error,
                "custom field creation failed"
            );
            MappingError::CustomFieldRejected {
                message: error.user_message().to_string(),
            }
        })?;

        let entry = FieldCatalogEntry::new(definition.catalog_key(), &definition.display_label);
        self.catalogs.get_mut(pending.entity).push(entry.clone());
        self.created.push(definition);

        let idx = self.position(&pending.csv_column)?;
        self.mappings[idx].target = Some(MappingTarget {
            entity: pending.entity,
            field: Some(entry.value.clone()),
        });
        self.origins[idx] = MappingOrigin::Manual;
        self.pending = None;
        info!(
            column = %pending.csv_column,
            entity = %pending.entity,
            field = %entry.value,
            "custom field created and assigned"
        );
        Ok(entry)
    }

    /// Re-applies a saved profile on top of the current mappings.
    pub fn apply_profile(&mut self, profile: &MappingProfile) -> ProfileApplication {
        let mut outcome = ProfileApplication::default();
        for saved in &profile.mappings {
            let Ok(idx) = self.position(&saved.csv_column) else {
                outcome.missing_columns.push(saved.csv_column.clone());
                continue;
            };
            match &saved.target {
                None => self.mappings[idx].target = None,
                Some(target) => {
                    if let Some(field) = &target.field
                        && !self.catalogs.get(target.entity).contains(field)
                    {
                        outcome
                            .unknown_fields
                            .push((saved.csv_column.clone(), field.clone()));
                        continue;
                    }
                    self.mappings[idx].target = Some(target.clone());
                }
            }
            self.origins[idx] = MappingOrigin::Manual;
            outcome.applied.push(saved.csv_column.clone());
        }
        outcome
    }

    pub fn summary(&self) -> MappingSummary {
        let mut summary = MappingSummary {
            total: self.mappings.len(),
            mapped: 0,
            skipped: 0,
            incomplete: 0,
            contact: 0,
            account: 0,
        };
        for mapping in &self.mappings {
            match mapping.target_entity() {
                None => summary.skipped += 1,
                Some(entity) => {
                    if mapping.is_mapped() {
                        summary.mapped += 1;
                    } else {
                        summary.incomplete += 1;
                    }
                    match entity {
                        TargetEntity::Contact => summary.contact += 1,
                        TargetEntity::Account => summary.account += 1,
                    }
                }
            }
        }
        summary
    }

    /// Finalizes the mapping. Dropping the editor instead discards everything.
    pub fn confirm(self) -> Vec<FieldMapping> {
        self.mappings
    }

    fn position(&self, column: &str) -> Result<usize, MappingError> {
        self.mappings
            .iter()
            .position(|m| m.csv_column == column)
            .ok_or_else(|| MappingError::ColumnNotFound(column.to_string()))
    }
}

fn is_valid_field_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
