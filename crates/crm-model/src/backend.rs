//! Backend operations the import pipeline depends on.

use crate::custom_field::{CustomFieldDefinition, NewCustomField};
use crate::entity::TargetEntity;
use crate::error::Result;
use crate::import::ImportBatchResult;
use crate::payload::{AutoRegisterRequest, ImportRecord};

/// The CRM server, as seen by the importer.
///
/// Implemented over HTTP for real runs and in memory for tests.
pub trait CrmBackend {
    /// Upserts contacts (and their accounts) in one call.
    fn bulk_upsert(&self, records: &[ImportRecord]) -> Result<ImportBatchResult>;

    /// Lists active custom field definitions, optionally for one entity.
    fn list_custom_fields(
        &self,
        entity: Option<TargetEntity>,
    ) -> Result<Vec<CustomFieldDefinition>>;

    /// Creates a custom field definition.
    ///
    /// Fails with [`BackendError::Duplicate`](crate::BackendError::Duplicate)
    /// when the key already exists for the entity.
    fn create_custom_field(&self, field: &NewCustomField) -> Result<CustomFieldDefinition>;

    /// Ensures each key exists as a definition. Already known keys are a no-op.
    fn auto_register_custom_fields(&self, request: &AutoRegisterRequest) -> Result<()>;
}

impl<B: CrmBackend + ?Sized> CrmBackend for &B {
    fn bulk_upsert(&self, records: &[ImportRecord]) -> Result<ImportBatchResult> {
        (**self).bulk_upsert(records)
    }

    fn list_custom_fields(
        &self,
        entity: Option<TargetEntity>,
    ) -> Result<Vec<CustomFieldDefinition>> {
        (**self).list_custom_fields(entity)
    }

    fn create_custom_field(&self, field: &NewCustomField) -> Result<CustomFieldDefinition> {
        (**self).create_custom_field(field)
    }

    fn auto_register_custom_fields(&self, request: &AutoRegisterRequest) -> Result<()> {
        (**self).auto_register_custom_fields(request)
    }
}
