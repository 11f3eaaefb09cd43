use crm_model::{CustomFieldDefinition, FieldMapping, FieldType, TargetEntity};
use crm_validate::{ConfigError, RowValidator, check_required_mappings};
use proptest::prelude::*;

fn custom(
    entity: TargetEntity,
    key: &str,
    field_type: FieldType,
    is_required: bool,
) -> CustomFieldDefinition {
    CustomFieldDefinition {
        entity_type: entity,
        field_key: key.to_string(),
        display_label: key.to_string(),
        field_type,
        active: true,
        is_required,
    }
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn mappings() -> Vec<FieldMapping> {
    vec![
        FieldMapping::mapped("Email", TargetEntity::Contact, "email"),
        FieldMapping::mapped("Company", TargetEntity::Account, "name"),
        FieldMapping::mapped("Score", TargetEntity::Contact, "custom_score"),
        FieldMapping::mapped("Renewal", TargetEntity::Account, "custom_renewal"),
        FieldMapping::unmapped("Notes"),
    ]
}

fn definitions() -> Vec<CustomFieldDefinition> {
    vec![
        custom(TargetEntity::Contact, "score", FieldType::Number, true),
        custom(TargetEntity::Account, "renewal", FieldType::Date, false),
        // Same key on the other entity must not leak its rules.
        custom(TargetEntity::Account, "score", FieldType::Boolean, false),
    ]
}

#[test]
fn missing_email_mapping_blocks_with_named_field() {
    let mappings = vec![
        FieldMapping::mapped("Name", TargetEntity::Contact, "fullName"),
        FieldMapping::unmapped("Email"),
    ];
    let error = check_required_mappings(&mappings).unwrap_err();
    assert_eq!(error, ConfigError::MissingContactEmail);
    assert!(error.to_string().to_lowercase().contains("email"));
}

#[test]
fn account_columns_require_account_name() {
    let mappings = vec![
        FieldMapping::mapped("Email", TargetEntity::Contact, "email"),
        FieldMapping::mapped("Website", TargetEntity::Account, "domain"),
    ];
    let error = check_required_mappings(&mappings).unwrap_err();
    assert_eq!(error, ConfigError::MissingAccountName);
    assert!(error.to_string().contains("account name"));
}

#[test]
fn contact_only_mapping_passes() {
    let contact_only = vec![FieldMapping::mapped("Email", TargetEntity::Contact, "email")];
    assert_eq!(check_required_mappings(&contact_only), Ok(()));
    assert_eq!(check_required_mappings(&mappings()), Ok(()));
}

#[test]
fn clean_rows_produce_clean_report() {
    let validator = RowValidator::new(&mappings(), &definitions());
    let rows = vec![
        row(&["jane@acme.com", "Acme", "12", "2024-06-30", "anything"]),
        row(&["bob@acme.com", "Acme", "1,200", "", ""]),
    ];
    let report = validator.validate_rows(&rows);
    assert!(report.is_clean());
    assert_eq!(report.rows_checked, 2);
}

#[test]
fn errors_carry_report_row_and_record_key() {
    let validator = RowValidator::new(&mappings(), &definitions());
    let rows = vec![
        row(&["jane@acme.com", "Acme", "12", "", ""]),
        row(&["not-an-email", "Acme", "", "someday", ""]),
        row(&["bob@acme.com", "Acme", "lots", "2024-02-30", ""]),
    ];
    let report = validator.validate_rows(&rows);

    let found: Vec<(usize, &str, &str)> = report
        .errors
        .iter()
        .map(|e| (e.row, e.field.as_str(), e.value.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (3, "email", "not-an-email"),
            (3, "custom_score", ""),
            (3, "account_custom_renewal", "someday"),
            (4, "custom_score", "lots"),
            (4, "account_custom_renewal", "2024-02-30"),
        ]
    );
    assert_eq!(report.rows_with_errors(), 2);
    assert_eq!(report.errors_for_row(3).count(), 3);
    assert_eq!(report.errors[0].error, "Invalid email format");
    assert_eq!(report.errors[1].error, "Required field is empty");
}

#[test]
fn empty_email_is_left_to_the_importer() {
    let validator = RowValidator::new(&mappings(), &definitions());
    let errors = validator.validate_row(0, &row(&["", "Acme", "5", "", ""]));
    assert!(errors.is_empty());
}

#[test]
fn short_rows_read_missing_cells_as_empty() {
    let validator = RowValidator::new(&mappings(), &definitions());
    let errors = validator.validate_row(7, &row(&["jane@acme.com"]));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row, 9);
    assert_eq!(errors[0].field, "custom_score");
}

#[test]
fn unknown_custom_fields_are_not_checked() {
    let mappings = vec![
        FieldMapping::mapped("Email", TargetEntity::Contact, "email"),
        FieldMapping::mapped("Tier", TargetEntity::Contact, "custom_tier"),
    ];
    let validator = RowValidator::new(&mappings, &[]);
    assert!(validator.validate_row(0, &row(&["a@b.co", ""])).is_empty());
}

proptest! {
    #[test]
    fn every_row_is_checked(bad in proptest::collection::vec(any::<bool>(), 0..40)) {
        let mappings = vec![FieldMapping::mapped("Email", TargetEntity::Contact, "email")];
        let validator = RowValidator::new(&mappings, &[]);
        let rows: Vec<Vec<String>> = bad
            .iter()
            .map(|&b| row(&[if b { "broken" } else { "ok@acme.com" }]))
            .collect();
        let report = validator.validate_rows(&rows);

        let expected: Vec<usize> = bad
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(|(i, _)| i + 2)
            .collect();
        let rows_reported: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
        prop_assert_eq!(rows_reported, expected);
        prop_assert_eq!(report.rows_checked, bad.len());
    }
}
