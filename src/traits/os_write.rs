//! Whole-file writes.

use std::path::Path;

use crate::{Content, OsError};

/// Write operations.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn OsWrite`.
pub trait OsWrite: Send + Sync {
    /// Replace the contents of `path` with `content`.
    ///
    /// Creates the file if absent and truncates it otherwise. Text content is
    /// written as UTF-8. Succeeds only once every byte has been handed to the
    /// filesystem; parent directories must already exist.
    ///
    /// # Errors
    ///
    /// - [`OsError::NotFound`] if the parent directory does not exist
    /// - [`OsError::PermissionDenied`] if write access is denied
    /// - [`OsError::IsADirectory`] if the path is a directory
    /// - [`OsError::NoSpace`] if the device or quota is full
    /// - [`OsError::TooLarge`] if the payload exceeds a configured limit
    /// - [`OsError::Io`] for other failures
    fn write_file(&self, path: &Path, content: Content<'_>) -> Result<(), OsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_write_is_object_safe() {
        fn _check(_: &dyn OsWrite) {}
    }
}
