use std::fs;

use crm_ingest::{IngestError, read_csv_table, read_csv_table_from_reader};
use crm_model::{FieldMapping, TargetEntity};

#[test]
fn reads_headers_and_rows_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("contacts.csv");
    fs::write(
        &path,
        "\u{feff}Company Name, Contact Email ,Phone\nAcme, jane@acme.com ,555-0100\n",
    )
    .expect("write csv");

    let table = read_csv_table(&path).expect("read csv");
    assert_eq!(table.headers, vec!["Company Name", "Contact Email", "Phone"]);
    assert_eq!(table.rows, vec![vec!["Acme", "jane@acme.com", "555-0100"]]);
}

#[test]
fn skips_blank_lines_and_pads_short_rows() {
    let input = "Email,First Name,Last Name\n\n , , \njane@acme.com,Jane\nbob@acme.com,Bob,Stone,extra\n";
    let table = read_csv_table_from_reader(input.as_bytes()).expect("read csv");

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0], vec!["jane@acme.com", "Jane", ""]);
    assert_eq!(table.rows[1], vec!["bob@acme.com", "Bob", "Stone"]);
}

#[test]
fn quoted_cells_keep_commas() {
    let input = "Email,Company Name\njane@acme.com,\"Acme, Inc.\"\n";
    let table = read_csv_table_from_reader(input.as_bytes()).expect("read csv");
    assert_eq!(table.rows[0][1], "Acme, Inc.");
}

#[test]
fn duplicate_headers_are_renamed() {
    let input = "Email,Phone,Phone\na@b.com,1,2\n";
    let table = read_csv_table_from_reader(input.as_bytes()).expect("read csv");
    assert_eq!(table.headers, vec!["Email", "Phone", "Phone_1"]);
}

#[test]
fn missing_and_empty_files_are_errors() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.csv");
    assert!(matches!(
        read_csv_table(&missing),
        Err(IngestError::FileNotFound { .. })
    ));

    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "\n\n").expect("write csv");
    assert!(matches!(
        read_csv_table(&empty),
        Err(IngestError::EmptyCsv { .. })
    ));
}

#[test]
fn header_only_file_has_no_rows() {
    let table = read_csv_table_from_reader("Email,Phone\n".as_bytes()).expect("read csv");
    assert_eq!(table.headers.len(), 2);
    assert!(table.is_empty());
}

#[test]
fn project_rows_follows_mapping_order() {
    let input = "Phone,Email,Company\n555,jane@acme.com,Acme\n";
    let table = read_csv_table_from_reader(input.as_bytes()).expect("read csv");
    let mappings = vec![
        FieldMapping::mapped("Email", TargetEntity::Contact, "email"),
        FieldMapping::mapped("Company", TargetEntity::Account, "name"),
        FieldMapping::unmapped("Phone"),
        FieldMapping::mapped("Gone", TargetEntity::Contact, "city"),
    ];

    let projected = table.project_rows(&mappings);
    assert_eq!(projected, vec![vec!["jane@acme.com", "Acme", "555", ""]]);
}
