use std::collections::BTreeSet;

use serde::Serialize;

use crm_model::ValidationError;

/// Outcome of validating every row of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub rows_checked: usize,
    /// Errors in row order, then column order.
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of distinct rows with at least one error.
    pub fn rows_with_errors(&self) -> usize {
        self.errors
            .iter()
            .map(|e| e.row)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn errors_for_row(&self, row: usize) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.row == row)
    }
}
