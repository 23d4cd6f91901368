//! Whole-file and directory reads.

use std::path::Path;

use crate::{Data, DirEntry, OsError};

/// Read operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Every call opens and releases
/// its own handle; no state is shared between in-flight calls.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn OsRead`.
pub trait OsRead: Send + Sync {
    /// Read the entire contents of a file.
    ///
    /// Either the full contents are returned or an error; never a prefix.
    ///
    /// # Errors
    ///
    /// - [`OsError::NotFound`] if the path does not exist
    /// - [`OsError::PermissionDenied`] if read access is denied
    /// - [`OsError::IsADirectory`] if the path is a directory
    /// - [`OsError::TooLarge`] if the file exceeds a configured limit
    /// - [`OsError::Io`] if the read fails part way
    fn read_file(&self, path: &Path) -> Result<Data, OsError>;

    /// List a directory, sorted by name, without `.` and `..`.
    ///
    /// # Errors
    ///
    /// - [`OsError::NotFound`] if the path does not exist
    /// - [`OsError::PermissionDenied`] if listing is denied
    /// - [`OsError::Io`] if the path is not a directory
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, OsError>;
}
