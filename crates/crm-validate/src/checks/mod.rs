//! Per-cell validation checks.
//!
//! Each module checks one concern for a single value. Empty values are only
//! the concern of [`required`].

mod datatype;
mod email;
mod required;

pub use datatype::coerce_error;
pub use email::is_valid_email;

use crm_model::FieldType;

/// What to check for one mapped column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnChecks {
    pub email: bool,
    pub required: bool,
    pub field_type: Option<FieldType>,
}

impl ColumnChecks {
    pub fn is_empty(&self) -> bool {
        !self.email && !self.required && self.field_type.is_none()
    }
}

/// Runs every check configured for a column, returning the first failure.
pub(crate) fn run_all(checks: &ColumnChecks, value: &str) -> Option<String> {
    let value = value.trim();

    // 1. Required custom fields must be non-empty
    if checks.required
        && let Some(error) = required::check(value)
    {
        return Some(error);
    }
    if value.is_empty() {
        return None;
    }

    // 2. Email shape
    if checks.email
        && let Some(error) = email::check(value)
    {
        return Some(error);
    }

    // 3. Custom field type coercion
    checks
        .field_type
        .and_then(|field_type| datatype::check(field_type, value))
}
