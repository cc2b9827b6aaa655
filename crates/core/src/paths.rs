//! Path-safety checks for client-supplied filenames.
//!
//! Every path the catalog stores is relative to the owning game's folder.
//! Uploaded filenames must stay inside that folder: no separators, no
//! traversal segments, no absolute paths.

use crate::error::CoreError;

/// Validate a client-supplied filename destined for a game folder root.
///
/// Rejects empty names, path separators (both `/` and `\`), traversal
/// segments, and names that the filesystem would treat specially.
pub fn validate_upload_filename(filename: &str) -> Result<(), CoreError> {
    if filename.is_empty() {
        return Err(CoreError::Validation(
            "Filename must not be empty".to_string(),
        ));
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(CoreError::Validation(format!(
            "Filename must not contain path separators: '{filename}'"
        )));
    }
    if filename == "." || filename == ".." {
        return Err(CoreError::Validation(format!(
            "Filename must not be a traversal segment: '{filename}'"
        )));
    }
    if filename.contains('\0') {
        return Err(CoreError::Validation(
            "Filename must not contain NUL bytes".to_string(),
        ));
    }
    Ok(())
}

/// Check that a stored asset reference stays inside the game folder.
///
/// Used when validating records loaded from disk: the path must be
/// relative and free of `..` components.
pub fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.starts_with('\\') {
        return false;
    }
    // Windows drive prefix.
    if path.len() >= 2 && path.as_bytes()[1] == b':' {
        return false;
    }
    !path
        .split(['/', '\\'])
        .any(|segment| segment == ".." || segment.is_empty())
}
