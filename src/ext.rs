//! # Extension Traits
//!
//! Convenience methods for every facade backend.
//!
//! [`OsExt`] is blanket-implemented for any [`Os`], including `dyn Os`.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`exists`](OsExt::exists) | Check if anything exists at a path |
//! | [`is_file`](OsExt::is_file) | Check if path is a regular file |
//! | [`is_dir`](OsExt::is_dir) | Check if path is a directory |
//! | [`read_to_string`](OsExt::read_to_string) | Read a UTF-8 file |
//! | [`var`](OsExt::var) | Look up one environment variable |
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, `OsExtJson` adds `read_json` and
//! `write_json`.

use crate::{Os, OsError, Stats};
use std::path::Path;

/// Extension methods for any facade backend.
///
/// # Example
///
/// ```rust
/// use hostos::{Os, OsExt, OsError};
/// use std::path::Path;
///
/// fn load_motd<O: Os>(os: &O) -> Result<Option<String>, OsError> {
///     let path = Path::new("/etc/motd");
///     if !os.is_file(path)? {
///         return Ok(None);
///     }
///     os.read_to_string(path).map(Some)
/// }
/// ```
pub trait OsExt: Os {
    /// Check if an entry exists at `path` (following symlinks).
    ///
    /// Returns `Ok(false)` if the path doesn't exist (not an error).
    /// Returns `Err` only for other failures (permission denied, etc.).
    fn exists(&self, path: &Path) -> Result<bool, OsError> {
        stat_matches(self.stat(path), |_| true)
    }

    /// Check if the path points to a regular file.
    ///
    /// Returns `Ok(false)` if the path doesn't exist.
    fn is_file(&self, path: &Path) -> Result<bool, OsError> {
        stat_matches(self.stat(path), Stats::is_file)
    }

    /// Check if the path points to a directory.
    ///
    /// Returns `Ok(false)` if the path doesn't exist.
    fn is_dir(&self, path: &Path) -> Result<bool, OsError> {
        stat_matches(self.stat(path), Stats::is_directory)
    }

    /// Read a whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// - Any error of [`read_file`](crate::OsRead::read_file)
    /// - [`OsError::InvalidData`] if the contents are not valid UTF-8
    fn read_to_string(&self, path: &Path) -> Result<String, OsError> {
        let data = self.read_file(path)?;
        String::from_utf8(data.into_vec()).map_err(|e| OsError::InvalidData {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Value of one environment variable from the current snapshot.
    fn var(&self, name: &str) -> Option<String> {
        self.env().get(name).map(str::to_owned)
    }
}

impl<O: Os + ?Sized> OsExt for O {}

fn stat_matches(
    stat: Result<Stats, OsError>,
    test: impl FnOnce(&Stats) -> bool,
) -> Result<bool, OsError> {
    match stat {
        Ok(s) => Ok(test(&s)),
        Err(OsError::NotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

// =============================================================================
// JSON Support (Feature-Gated)
// =============================================================================

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::{Serialize, de::DeserializeOwned};

    /// JSON serialization extension methods.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait OsExtJson: Os {
        /// Read a file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - Any error of [`read_file`](crate::OsRead::read_file)
        /// - [`OsError::InvalidData`] if parsing fails
        fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, OsError> {
            let data = self.read_file(path)?;
            serde_json::from_slice(&data).map_err(|e| OsError::InvalidData {
                path: path.to_path_buf(),
                details: e.to_string(),
            })
        }

        /// Serialize a value as pretty-printed JSON and write it.
        ///
        /// # Errors
        ///
        /// - [`OsError::InvalidData`] if serialization fails
        /// - Any error of [`write_file`](crate::OsWrite::write_file)
        fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), OsError> {
            let json = serde_json::to_string_pretty(value).map_err(|e| OsError::InvalidData {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;
            self.write_file(path, json.as_str().into())
        }
    }

    impl<O: Os + ?Sized> OsExtJson for O {}
}

#[cfg(feature = "serde")]
pub use json::OsExtJson;
