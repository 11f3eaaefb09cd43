use serde::{Deserialize, Serialize};

/// Offset between a 0-based data row index and its report row number
/// (the header occupies row 1).
pub const HEADER_ROW_OFFSET: usize = 2;

/// Converts a 0-based data row index into the 1-based row number users see.
pub fn report_row(data_index: usize) -> usize {
    data_index + HEADER_ROW_OFFSET
}

/// A single offending cell found during row validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 1-based report row (data row 0 is row 2).
    pub row: usize,
    /// Target field key the value was checked against.
    pub field: String,
    pub value: String,
    /// Human-readable reason.
    pub error: String,
}
