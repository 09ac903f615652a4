//! Shared error-code interface.
//!
//! Every rolebind error enum implements [`ErrorCode`] so callers can
//! branch on a stable machine-readable code and know whether the user
//! can fix the problem by correcting input.
//!
//! # Example
//!
//! ```
//! use rolebind_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     NotFound(String),
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         "LOOKUP_NOT_FOUND"
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let err = LookupError::NotFound("Jimmy".into());
//! assert_eq!(err.code(), "LOOKUP_NOT_FOUND");
//! ```

/// Machine-readable error code and recoverability.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE, prefixed with the owning layer
///   (`STORE_`, `LOOKUP_`, `SERVICE_`, `CONFIG_`, `SNAPSHOT_`)
/// - Stable once published
///
/// # Recoverability
///
/// Recoverable means the caller can act on it: fix a typo in a login,
/// or accept that a binding already exists. Invariant violations and I/O
/// failures are not recoverable.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the caller can recover by changing its input.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows the naming conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix`, or is not
/// UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use rolebind_types::{ErrorCode, assert_error_code};
///
/// #[derive(Debug)]
/// enum MyError { Duplicate }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str { "STORE_ALREADY_EXISTS" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&MyError::Duplicate, "STORE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every error in `errors`; see [`assert_error_code`].
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
