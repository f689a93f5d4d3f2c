//! CLI-facing types: exit codes and answer validation for names.
//!
//! # Examples
//!
//! ```
//! use bitcart_core::cli::{ExitCode, validate_path_segment};
//!
//! assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
//! assert!(validate_path_segment("demo").is_ok());
//! assert!(validate_path_segment("../escape").is_err());
//! ```

use std::fmt;

/// Process exit code.
///
/// Every fatal condition maps to [`ExitCode::ERROR`]; there are no
/// partial-success codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// Any fatal error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checks that `value` can be used as a single directory or file name.
///
/// Plugin, author and component names become path segments inside host
/// repositories and are rendered into quoted JSON and Python strings, so
/// separators, parent references, double quotes and control characters are
/// rejected.
///
/// # Errors
///
/// Returns a human-readable reason when the value is not a safe segment.
pub fn validate_path_segment(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Value is required".to_string());
    }
    if value != value.trim() {
        return Err("must not start or end with whitespace".to_string());
    }
    if value == "." || value == ".." {
        return Err("must not be a relative directory reference".to_string());
    }
    if value.contains(['/', '\\']) {
        return Err("must not contain path separators".to_string());
    }
    if value.contains('"') {
        return Err("must not contain double quotes".to_string());
    }
    if value.chars().any(char::is_control) {
        return Err("must not contain control characters".to_string());
    }
    Ok(())
}
