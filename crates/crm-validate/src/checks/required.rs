//! Required custom fields.

pub fn check(value: &str) -> Option<String> {
    value
        .is_empty()
        .then(|| "Required field is empty".to_string())
}
