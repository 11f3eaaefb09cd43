pub mod backend;
pub mod custom_field;
pub mod entity;
pub mod error;
pub mod import;
pub mod mapping;
pub mod payload;
pub mod validation;

pub use backend::CrmBackend;
pub use custom_field::{
    CUSTOM_FIELD_PREFIX, CustomFieldDefinition, NewCustomField, custom_field_key,
};
pub use entity::{FieldType, TargetEntity};
pub use error::{BackendError, Result};
pub use import::{
    BatchRowError, ImportBatchResult, ImportRowError, ImportSummary, RegistrationReport,
};
pub use mapping::{FieldCatalogEntry, FieldMapping, MappingTarget};
pub use payload::{AutoRegisterRequest, EntityPayload, ImportRecord};
pub use validation::{HEADER_ROW_OFFSET, ValidationError, report_row};
