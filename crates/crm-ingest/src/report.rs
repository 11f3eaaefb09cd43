//! CSV reports handed back to the user.

use std::io::Write;

use csv::WriterBuilder;

use crm_model::{ImportRowError, ValidationError};

use crate::error::Result;

pub const ERROR_REPORT_HEADERS: [&str; 4] = ["Row", "Field", "Value", "Error"];

/// Writes row validation errors as `Row,Field,Value,Error`.
pub fn write_error_report<W: Write>(writer: W, errors: &[ValidationError]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(ERROR_REPORT_HEADERS)?;
    for error in errors {
        writer.write_record([
            error.row.to_string().as_str(),
            error.field.as_str(),
            error.value.as_str(),
            error.error.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes per-row import failures as `Row,Error`.
pub fn write_import_error_report<W: Write>(writer: W, errors: &[ImportRowError]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(["Row", "Error"])?;
    for error in errors {
        writer.write_record([error.row.to_string().as_str(), error.error.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
