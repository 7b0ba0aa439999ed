// Rust guideline compliant 2026-02-06

//! Shell quoting.

/// Wraps `value` in single quotes, escaping embedded single quotes.
///
/// The result is safe to splice into a POSIX shell command line as a single
/// word: each `'` becomes `'"'"'` (close quote, double-quoted quote, reopen).
///
/// # Examples
///
/// ```
/// use baseutils_core::shell_escape;
///
/// assert_eq!(shell_escape("a'b"), r#"'a'"'"'b'"#);
/// ```
pub fn shell_escape(value: &str) -> String {
    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}
