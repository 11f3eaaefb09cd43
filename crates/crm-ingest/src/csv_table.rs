use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crm_map::safe_column_name;
use crm_model::FieldMapping;

use crate::error::{IngestError, Result};

/// An import file: one header row and its data rows.
///
/// Every row has exactly `headers.len()` cells. Short rows are padded with
/// empty strings, extra cells are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Re-projects every row into mapping order.
    ///
    /// Cell `j` of each output row is the value of `mappings[j].csv_column`;
    /// a column missing from the file yields an empty string.
    pub fn project_rows(&self, mappings: &[FieldMapping]) -> Vec<Vec<String>> {
        let indices: Vec<Option<usize>> = mappings
            .iter()
            .map(|m| self.column_index(&m.csv_column))
            .collect();
        for (mapping, index) in mappings.iter().zip(&indices) {
            if index.is_none() {
                warn!(column = %mapping.csv_column, "mapped column not present in file");
            }
        }
        self.rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| idx.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .trim()
        .to_string()
}

/// Names empty headers by position and renames repeats `Name_1`, `Name_2`, ...
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, header) in raw.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("Column {}", idx + 1)
        } else {
            header
        };
        let mut name = base.clone();
        while used.contains(&name) {
            let count = repeats.entry(base.clone()).or_insert(0);
            *count += 1;
            name = format!("{base}_{count}");
        }
        if name != base {
            debug!(original = %base, renamed = %name, "duplicate header renamed");
        }
        used.insert(name.clone());
        headers.push(name);
    }
    headers
}

/// Reads an import file from disk.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(file, path)?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "csv loaded"
    );
    Ok(table)
}

/// Reads an import file from any reader, e.g. an upload body.
pub fn read_csv_table_from_reader<R: Read>(reader: R) -> Result<CsvTable> {
    parse_table(reader, Path::new("<input>"))
}

fn parse_table<R: Read>(reader: R, origin: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        if record.iter().all(|value| normalize_cell(value).is_empty()) {
            continue;
        }
        match &headers {
            None => {
                headers = Some(dedupe_headers(
                    record.iter().map(safe_column_name).collect(),
                ));
            }
            Some(headers) => {
                let mut row: Vec<String> = record.iter().map(normalize_cell).collect();
                row.resize(headers.len(), String::new());
                rows.push(row);
            }
        }
    }

    let headers = headers.ok_or_else(|| IngestError::EmptyCsv {
        path: origin.to_path_buf(),
    })?;
    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn repeated_headers_get_numeric_suffixes() {
        let headers = dedupe_headers(strings(&["Email", "Phone", "Email", "Email"]));
        assert_eq!(headers, strings(&["Email", "Phone", "Email_1", "Email_2"]));
    }

    #[test]
    fn suffix_skips_names_already_taken() {
        let headers = dedupe_headers(strings(&["Email", "Email_1", "Email"]));
        assert_eq!(headers, strings(&["Email", "Email_1", "Email_2"]));
    }

    #[test]
    fn empty_headers_are_named_by_position() {
        let headers = dedupe_headers(strings(&["Email", "", ""]));
        assert_eq!(headers, strings(&["Email", "Column 2", "Column 3"]));
    }

    #[test]
    fn cells_lose_whitespace_and_bom() {
        assert_eq!(normalize_cell("\u{feff} value "), "value");
    }
}
