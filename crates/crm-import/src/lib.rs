//! Import execution for contact/account CSV files.
//!
//! - [`BatchImporter`]: sequential bulk upserts with per-batch failure isolation
//! - [`register_custom_fields`]: best-effort registration of custom keys
//! - [`ImportSession`]: the upload → mapping → validate → preview → import flow
//! - [`HttpBackend`]: the REST implementation of [`CrmBackend`](crm_model::CrmBackend)

#![deny(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod http;
pub mod importer;
pub mod payload;
pub mod progress;
pub mod registrar;
pub mod session;

pub use cancel::CancelToken;
pub use config::{BatchSize, ImportOptions};
pub use error::SessionError;
pub use http::{DEFAULT_TIMEOUT, HttpBackend};
pub use importer::{BatchImporter, MISSING_EMAIL_ERROR};
pub use payload::{MappedRecord, build_mapped_record, is_unified, to_import_record};
pub use progress::{ImportProgress, NoProgress, ProgressUpdate};
pub use registrar::{CustomFieldKeys, collect_custom_field_keys, register_custom_fields};
pub use session::{ImportSession, Stage, StageKind};
