//! Header normalization shared by the catalog scan and the alias table.

/// Normalizes a CSV header into a comparison key.
///
/// Lower-cases and removes underscores, spaces and hyphens. Total: every
/// input, including the empty string, yields a key.
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Trims whitespace and a leading byte-order mark from a header, preserving casing.
pub fn safe_column_name(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Exact-or-mutual-substring predicate used by the catalog scans.
///
/// An empty key never matches; it would otherwise be contained in every entry.
pub(crate) fn keys_overlap(header_key: &str, field_key: &str) -> bool {
    if header_key.is_empty() || field_key.is_empty() {
        return false;
    }
    header_key == field_key || header_key.contains(field_key) || field_key.contains(header_key)
}
