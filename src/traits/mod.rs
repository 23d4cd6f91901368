//! # Facade Traits
//!
//! The facade is split into small component traits, combined by the
//! [`Os`] composite:
//!
//! ```text
//! OsStat + OsRead + OsWrite + OsEnv = Os
//! ```
//!
//! | Trait | Methods |
//! |-------|---------|
//! | [`OsStat`] | `stat`, `lstat` |
//! | [`OsRead`] | `read_file`, `read_dir` |
//! | [`OsWrite`] | `write_file` |
//! | [`OsEnv`] | `env` |
//!
//! ## Blanket Implementation
//!
//! Implement the four component traits and `Os` comes for free:
//!
//! ```rust
//! use hostos::{Content, Data, DirEntry, Env, Os, OsEnv, OsError, OsRead, OsStat, OsWrite, Stats};
//! use std::path::Path;
//!
//! struct Empty;
//!
//! impl OsStat for Empty {
//!     fn stat(&self, path: &Path) -> Result<Stats, OsError> {
//!         Err(OsError::NotFound { path: path.to_path_buf() })
//!     }
//!     fn lstat(&self, path: &Path) -> Result<Stats, OsError> {
//!         self.stat(path)
//!     }
//! }
//! # impl OsRead for Empty {
//! #     fn read_file(&self, p: &Path) -> Result<Data, OsError> { Err(OsError::NotFound { path: p.into() }) }
//! #     fn read_dir(&self, p: &Path) -> Result<Vec<DirEntry>, OsError> { Err(OsError::NotFound { path: p.into() }) }
//! # }
//! # impl OsWrite for Empty {
//! #     fn write_file(&self, _: &Path, _: Content<'_>) -> Result<(), OsError> { Ok(()) }
//! # }
//! # impl OsEnv for Empty {
//! #     fn env(&self) -> Env { Env::default() }
//! # }
//!
//! fn use_os(_os: &dyn Os) {}
//! use_os(&Empty);
//! ```
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` so a host can share one backend across
//! worker threads, e.g. as `Arc<dyn Os>`.

mod os_env;
mod os_read;
mod os_stat;
mod os_write;

pub use os_env::OsEnv;
pub use os_read::OsRead;
pub use os_stat::OsStat;
pub use os_write::OsWrite;

/// The complete facade a scripting host binds as its `os` namespace.
///
/// Automatically implemented for any type implementing all four component
/// traits. You never need to implement `Os` directly.
///
/// # Example
///
/// ```rust
/// use hostos::{Os, OsError};
/// use std::path::Path;
///
/// fn backup<O: Os + ?Sized>(os: &O, src: &Path, dst: &Path) -> Result<(), OsError> {
///     let data = os.read_file(src)?;
///     os.write_file(dst, (&data).into())
/// }
/// ```
pub trait Os: OsStat + OsRead + OsWrite + OsEnv {}

impl<T: OsStat + OsRead + OsWrite + OsEnv + ?Sized> Os for T {}
