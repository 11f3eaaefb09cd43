use crm_ingest::{write_error_report, write_import_error_report};
use crm_model::{ImportRowError, ValidationError};

fn render(bytes: Vec<u8>) -> String {
    let text = String::from_utf8(bytes).expect("utf8");
    text.lines().collect::<Vec<_>>().join("\n")
}

#[test]
fn validation_report_quotes_values() {
    let errors = vec![
        ValidationError {
            row: 2,
            field: "email".to_string(),
            value: "jane at acme".to_string(),
            error: "Invalid email format".to_string(),
        },
        ValidationError {
            row: 5,
            field: "custom_notes".to_string(),
            value: "Says \"hi\", often".to_string(),
            error: "Expected a number".to_string(),
        },
    ];
    let mut buf = Vec::new();
    write_error_report(&mut buf, &errors).expect("write report");

    insta::assert_snapshot!(render(buf), @r#"
    Row,Field,Value,Error
    2,email,jane at acme,Invalid email format
    5,custom_notes,"Says ""hi"", often",Expected a number
    "#);
}

#[test]
fn empty_validation_report_is_header_only() {
    let mut buf = Vec::new();
    write_error_report(&mut buf, &[]).expect("write report");
    insta::assert_snapshot!(render(buf), @"Row,Field,Value,Error");
}

#[test]
fn import_report_lists_rows() {
    let errors = vec![
        ImportRowError {
            row: 53,
            error: "Missing email".to_string(),
        },
        ImportRowError {
            row: 101,
            error: "Batch request failed".to_string(),
        },
    ];
    let mut buf = Vec::new();
    write_import_error_report(&mut buf, &errors).expect("write report");

    insta::assert_snapshot!(render(buf), @r"
    Row,Error
    53,Missing email
    101,Batch request failed
    ");
}
