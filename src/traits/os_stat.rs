//! Metadata queries.

use std::path::Path;

use crate::{OsError, Stats};

/// Metadata queries against a filesystem.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Each call is independent and
/// takes `&self`.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn OsStat`.
pub trait OsStat: Send + Sync {
    /// Snapshot the metadata of `path`, following symlinks.
    ///
    /// Relative paths resolve against the process working directory.
    ///
    /// # Errors
    ///
    /// - [`OsError::NotFound`] if no entry exists at `path`
    /// - [`OsError::PermissionDenied`] if the entry cannot be inspected
    /// - [`OsError::Io`] for anything else, e.g. a path component that is
    ///   not a directory
    fn stat(&self, path: &Path) -> Result<Stats, OsError>;

    /// Like [`stat`](Self::stat), but a final symlink is reported as itself.
    ///
    /// # Errors
    ///
    /// Same as [`stat`](Self::stat).
    fn lstat(&self, path: &Path) -> Result<Stats, OsError>;
}
