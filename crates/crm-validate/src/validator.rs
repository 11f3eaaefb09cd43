//! Row validator bound to a finalized mapping.

use tracing::{debug, info};

use crm_model::{
    CustomFieldDefinition, FieldMapping, FieldType, TargetEntity, ValidationError,
    custom_field_key, report_row,
};

use crate::checks::{self, ColumnChecks};
use crate::report::ValidationReport;

#[derive(Debug, Clone)]
struct ColumnRule {
    /// Position in the mapping (and in each projected row).
    position: usize,
    record_key: String,
    checks: ColumnChecks,
}

/// Validates rows whose values are in mapping order.
///
/// Checks are derived once from the mapping: email shape for the contact
/// email column, and for custom field columns the definition's required flag
/// and type. Columns without a field, or without checks, are never looked at.
#[derive(Debug, Clone)]
pub struct RowValidator {
    rules: Vec<ColumnRule>,
}

impl RowValidator {
    pub fn new(mappings: &[FieldMapping], custom_fields: &[CustomFieldDefinition]) -> Self {
        let rules: Vec<ColumnRule> = mappings
            .iter()
            .enumerate()
            .filter_map(|(position, mapping)| {
                let entity = mapping.target_entity()?;
                let field = mapping.target_field()?;
                let checks = column_checks(entity, field, custom_fields);
                if checks.is_empty() {
                    return None;
                }
                Some(ColumnRule {
                    position,
                    record_key: mapping.record_key()?,
                    checks,
                })
            })
            .collect();
        debug!(checked_columns = rules.len(), "row validator ready");
        Self { rules }
    }

    /// Validates one data row. `index` is the 0-based data row index.
    pub fn validate_row(&self, index: usize, values: &[String]) -> Vec<ValidationError> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let value = values.get(rule.position).map_or("", String::as_str);
                checks::run_all(&rule.checks, value).map(|error| ValidationError {
                    row: report_row(index),
                    field: rule.record_key.clone(),
                    value: value.to_string(),
                    error,
                })
            })
            .collect()
    }

    /// Validates every row; never stops at the first failure.
    pub fn validate_rows(&self, rows: &[Vec<String>]) -> ValidationReport {
        let errors: Vec<ValidationError> = rows
            .iter()
            .enumerate()
            .flat_map(|(index, values)| self.validate_row(index, values))
            .collect();
        let report = ValidationReport {
            rows_checked: rows.len(),
            errors,
        };
        info!(
            rows = report.rows_checked,
            errors = report.error_count(),
            rows_with_errors = report.rows_with_errors(),
            "row validation complete"
        );
        report
    }
}

fn column_checks(
    entity: TargetEntity,
    field: &str,
    custom_fields: &[CustomFieldDefinition],
) -> ColumnChecks {
    let definition = custom_field_key(field).and_then(|key| {
        custom_fields
            .iter()
            .find(|d| d.entity_type == entity && d.field_key == key)
    });
    ColumnChecks {
        email: entity == TargetEntity::Contact && field == "email",
        required: definition.is_some_and(|d| d.is_required),
        field_type: definition
            .map(|d| d.field_type)
            .filter(|&field_type| field_type != FieldType::Text),
    }
}
