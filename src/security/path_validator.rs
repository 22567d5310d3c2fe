//! Path validation and name sanitization for collector output.
//!
//! Context names (usually test node ids such as
//! `tests/test_vm.py::TestVM::test_start[fedora]`) and container names become
//! directory and file names, so they are reduced to a conservative
//! filesystem-safe alphabet before use.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::{MAX_SANITIZED_NAME_LEN, UNNAMED_COMPONENT};
use crate::error::StorageError;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// Turns an arbitrary string into a single safe path component.
///
/// Every character outside `[A-Za-z0-9._-]` is replaced with `_` (one
/// replacement per character, so distinct inputs of equal shape stay
/// readable). Leading and trailing dots are trimmed, which also rules out
/// `.` and `..`. The result is capped at [`MAX_SANITIZED_NAME_LEN`]
/// characters and is never empty.
pub fn sanitize_path_component(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name, "_");
    let truncated: String = replaced
        .trim_matches('.')
        .chars()
        .take(MAX_SANITIZED_NAME_LEN)
        .collect();
    let trimmed = truncated.trim_end_matches('.');

    if trimmed.is_empty() {
        UNNAMED_COMPONENT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Rejects destination paths that cannot name a directory.
pub fn validate_destination(path: &Path) -> Result<(), StorageError> {
    if path.as_os_str().is_empty() {
        return Err(StorageError::InvalidPath("empty path".to_string()));
    }

    if path.to_string_lossy().contains('\0') {
        return Err(StorageError::InvalidPath(format!(
            "{} contains a null byte",
            path.display()
        )));
    }

    Ok(())
}
