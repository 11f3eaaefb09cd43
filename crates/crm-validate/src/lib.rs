//! Validation for contact/account imports.
//!
//! Two layers run in order: [`check_required_mappings`] rejects a mapping
//! that cannot be imported at all, then [`RowValidator`] checks every row and
//! collects all offending cells.

pub mod checks;
mod config;
mod report;
mod validator;

pub use checks::{coerce_error, is_valid_email};
pub use config::{ConfigError, check_required_mappings};
pub use report::ValidationReport;
pub use validator::RowValidator;
