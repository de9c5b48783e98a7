use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters,
    /// underscores, dots and hyphens
    /// - Valid: "john_doe", "user123", "_admin", "chennai.mayor", "ward-7"
    /// - Invalid: "123user", "-user", "user name", ""
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_.\-]*$").unwrap();
}

/// Returns true when `name` is a single plain path component.
///
/// Upload filenames are stored verbatim, so anything that could escape the
/// uploads directory is refused.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
