//! File side of the import pipeline: reading the upload, projecting rows into
//! mapping order, and writing templates and error reports.

pub mod csv_table;
pub mod error;
pub mod report;
pub mod template;

pub use csv_table::{CsvTable, read_csv_table, read_csv_table_from_reader};
pub use error::{IngestError, Result};
pub use report::{ERROR_REPORT_HEADERS, write_error_report, write_import_error_report};
pub use template::{
    CsvTemplate, STANDARD_COLUMNS, TemplateColumn, build_template, custom_column_header,
    write_template,
};
