//! Type coercion for typed custom fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crm_model::FieldType;

/// Date layouts accepted for `date` fields, besides RFC 3339.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

const BOOLEAN_VALUES: &[&str] = &["true", "false", "yes", "no", "y", "n", "1", "0"];

pub fn check(field_type: FieldType, value: &str) -> Option<String> {
    coerce_error(field_type, value).map(str::to_string)
}

/// Returns why `value` cannot be stored in a field of `field_type`, if it cannot.
pub fn coerce_error(field_type: FieldType, value: &str) -> Option<&'static str> {
    let value = value.trim();
    match field_type {
        FieldType::Text => None,
        FieldType::Number => (!is_number(value)).then_some("Expected a number"),
        FieldType::Date => (!is_date(value)).then_some("Expected a date (YYYY-MM-DD)"),
        FieldType::Boolean => {
            (!is_boolean(value)).then_some("Expected a boolean (true/false, yes/no, 1/0)")
        }
    }
}

fn is_number(value: &str) -> bool {
    let cleaned: String = value.chars().filter(|&ch| ch != ',').collect();
    cleaned.parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_date(value: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || DateTime::parse_from_rfc3339(value).is_ok()
}

fn is_boolean(value: &str) -> bool {
    BOOLEAN_VALUES
        .iter()
        .any(|accepted| value.eq_ignore_ascii_case(accepted))
}
