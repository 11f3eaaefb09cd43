//! Email shape validation.
//!
//! Deliberately loose: one `@`, no whitespace, a dot in the domain part.
//! The backend is the authority on deliverability.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

pub fn check(value: &str) -> Option<String> {
    (!is_valid_email(value)).then(|| "Invalid email format".to_string())
}
