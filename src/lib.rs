//! # hostos
//!
//! A synchronous filesystem and environment facade for embedding into
//! scripting hosts that have no native file APIs of their own.
//!
//! The facade covers four entry points a host exposes as its `os`
//! namespace:
//!
//! | Script API | Rust | Returns |
//! |------------|------|---------|
//! | `os.stat(path)` | [`OsStat::stat`] | [`Stats`] |
//! | `os.readFile(path)` | [`OsRead::read_file`] | [`Data`] |
//! | `os.writeFile(path, content)` | [`OsWrite::write_file`] | `()` |
//! | `os.env` | [`OsEnv::env`] | [`Env`] |
//!
//! Each call blocks the calling thread until the OS finishes, holds no
//! state between calls and releases every handle before returning.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use hostos::{NativeOs, Os, OsError};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! // The host owns the facade and hands it to its runtime; there is no
//! // global namespace.
//! let os: Arc<dyn Os> = Arc::new(NativeOs::from_env());
//!
//! fn describe(os: &dyn Os, path: &Path) -> Result<String, OsError> {
//!     let stats = os.stat(path)?;
//!     Ok(format!("{} bytes, mode {:o}", stats.size, stats.mode))
//! }
//!
//! let _ = describe(&*os, Path::new("."));
//! ```
//!
//! ---
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, OsError>`. [`OsError::kind`]
//! collapses every error onto [`ErrorKind`]: `NotFound`, `PermissionDenied`,
//! `IsADirectory`, `NoSpace` or `Io`.
//!
//! ```rust
//! use hostos::{ErrorKind, NativeOs, OsRead};
//! use std::path::Path;
//!
//! let err = NativeOs::new()
//!     .read_file(Path::new("/definitely/not/here"))
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! ```
//!
//! ---
//!
//! ## Logging
//!
//! Operations emit [`tracing`] events: `trace` on success, `debug` on
//! failure. Install a subscriber in the host to see them.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`Stats`], [`Data`], [`Env`], [`OsConfig`], and `OsExtJson` |

mod config;
mod error;
mod ext;
mod layer;
mod native;
mod traits;
mod types;

// Public re-exports - error types
pub use error::{ErrorKind, OsError};

// Public re-exports - core types
pub use types::{Content, Data, DirEntry, Env, FileKind, Stats, mode};

// Public re-exports - configuration
pub use config::{EnvSnapshot, OsConfig};

// Public re-exports - facade traits
pub use traits::{Os, OsEnv, OsRead, OsStat, OsWrite};

// Public re-exports - backends and middleware
pub use layer::{Layer, LayerExt, ReadOnly, ReadOnlyLayer, Rooted, RootedLayer};
pub use native::NativeOs;

// Public re-exports - convenience
pub use ext::OsExt;

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::OsExtJson;
