//! Error types for the host OS facade.

use std::io;
use std::path::{Path, PathBuf};

/// Coarse error classification exposed to scripting hosts.
///
/// Every [`OsError`] collapses onto exactly one of these kinds via
/// [`OsError::kind`]. Hosts that surface errors to scripts usually only need
/// this taxonomy; the full [`OsError`] keeps the context for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// No filesystem entry exists at the path.
    NotFound,
    /// The entry exists but the process may not access it.
    PermissionDenied,
    /// The path names a directory where a file was required.
    IsADirectory,
    /// The device or quota ran out of space.
    NoSpace,
    /// Any other platform-level failure.
    Io,
}

impl ErrorKind {
    /// Stable name of the kind, suitable for exposing to scripts.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IsADirectory => "IsADirectory",
            ErrorKind::NoSpace => "NoSpace",
            ErrorKind::Io => "IOError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facade error type with contextual variants.
///
/// All variants carry the path (and operation, where it matters) that failed.
/// Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use hostos::{ErrorKind, OsError};
/// use std::path::PathBuf;
///
/// let err = OsError::NotFound { path: PathBuf::from("/missing") };
/// assert_eq!(err.to_string(), "not found: /missing");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum OsError {
    /// Path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Permission denied for operation.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: PathBuf,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// A directory was found where a file was required.
    #[error("{operation}: is a directory: {path}")]
    IsADirectory {
        /// The directory path.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    /// The device or quota is full.
    #[error("{operation}: no space left: {path}")]
    NoSpace {
        /// The path being written.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    /// Content size exceeds the configured limit.
    #[error("{operation}: too large: {path} ({size} > {limit})")]
    TooLarge {
        /// The path involved.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
        /// The actual size in bytes.
        size: u64,
        /// The configured limit in bytes.
        limit: u64,
    },

    /// Contents could not be decoded.
    #[error("invalid data: {path} ({details})")]
    InvalidData {
        /// The path with invalid data.
        path: PathBuf,
        /// Details about the invalid data.
        details: String,
    },

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl OsError {
    /// Classify an [`io::Error`] raised while running `operation` on `path`.
    pub fn from_io(operation: &'static str, path: &Path, error: io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            io::ErrorKind::NotFound => OsError::NotFound { path },
            io::ErrorKind::PermissionDenied => OsError::PermissionDenied { path, operation },
            io::ErrorKind::IsADirectory => OsError::IsADirectory { path, operation },
            io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => {
                OsError::NoSpace { path, operation }
            }
            _ => OsError::Io {
                operation,
                path,
                source: error,
            },
        }
    }

    /// The coarse [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OsError::NotFound { .. } => ErrorKind::NotFound,
            OsError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            OsError::IsADirectory { .. } => ErrorKind::IsADirectory,
            OsError::NoSpace { .. } => ErrorKind::NoSpace,
            OsError::TooLarge { .. } | OsError::InvalidData { .. } | OsError::Io { .. } => {
                ErrorKind::Io
            }
        }
    }

    /// The path the failing operation was applied to.
    pub fn path(&self) -> &Path {
        match self {
            OsError::NotFound { path }
            | OsError::PermissionDenied { path, .. }
            | OsError::IsADirectory { path, .. }
            | OsError::NoSpace { path, .. }
            | OsError::TooLarge { path, .. }
            | OsError::InvalidData { path, .. }
            | OsError::Io { path, .. } => path,
        }
    }

    /// Replace the path carried by this error, keeping everything else.
    ///
    /// Used by wrappers that translate paths before delegating, so the
    /// caller sees the path it passed in.
    pub fn with_path(mut self, new_path: impl Into<PathBuf>) -> Self {
        match &mut self {
            OsError::NotFound { path }
            | OsError::PermissionDenied { path, .. }
            | OsError::IsADirectory { path, .. }
            | OsError::NoSpace { path, .. }
            | OsError::TooLarge { path, .. }
            | OsError::InvalidData { path, .. }
            | OsError::Io { path, .. } => *path = new_path.into(),
        }
        self
    }
}
