//! CSV header mapping for contact/account imports.
//!
//! - [`normalize_header`]: comparison keys for raw headers
//! - [`Catalogs`]: base + custom fields per entity
//! - [`AutoMapper`]: prefix / catalog / alias passes
//! - [`MappingEditor`]: user overrides and custom field creation
//! - [`MappingProfileRepository`]: saved mapping sets

#![deny(unsafe_code)]

pub mod aliases;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod repository;
pub mod state;
pub mod utils;

pub use aliases::{alias_count, lookup_alias};
pub use catalog::{Catalogs, FieldCatalog, base_fields};
pub use engine::{
    ACCOUNT_PREFIX, AutoMapper, MappingResult, MappingSuggestion, MatchSource, auto_map,
    find_catalog_match,
};
pub use error::MappingError;
pub use repository::{MappingProfile, MappingProfileRepository, ProfileMetadata};
pub use state::{
    EntityChoice, FieldSelection, FieldSelectionOutcome, MappingEditor, MappingOrigin,
    MappingSummary, PendingFieldCreation, ProfileApplication,
};
pub use utils::{normalize_header, safe_column_name};
