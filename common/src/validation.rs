use std::sync::LazyLock;

use regex::Regex;
use validator::Validate;

use crate::error::Res;

/// Contact names: letters and whitespace only.
pub static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("name pattern compiles"));

/// Account emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Runs the schema attached to `value`, returning it untouched when every
/// rule holds.
pub fn validated<T: Validate>(value: T) -> Res<T> {
    value.validate()?;
    Ok(value)
}
