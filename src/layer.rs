//! # Layers
//!
//! Tower-style middleware composition for facade backends.
//!
//! ```text
//! Backend ──▶ Layer::layer() ──▶ Wrapped Backend
//! ```
//!
//! Each middleware is a wrapper struct implementing the facade traits plus a
//! [`Layer`] that builds it. Two are provided:
//!
//! | Layer | Wrapper | Effect |
//! |-------|---------|--------|
//! | [`ReadOnlyLayer`] | [`ReadOnly`] | `write_file` always fails with `PermissionDenied` |
//! | [`RootedLayer`] | [`Rooted`] | Confines every path beneath a root directory |
//!
//! ```rust
//! use hostos::{LayerExt, NativeOs, ReadOnlyLayer, RootedLayer};
//!
//! let os = NativeOs::new()
//!     .layer(RootedLayer::new("/srv/scripts"))
//!     .layer(ReadOnlyLayer);
//! # let _ = os;
//! ```

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::{
    Content, Data, DirEntry, Env, Os, OsEnv, OsError, OsRead, OsStat, OsWrite, Stats,
};

/// A layer that wraps a backend to add functionality.
///
/// - `layer(self, backend)` consumes both the layer and backend
/// - The resulting `Backend` should implement the same facade traits as `B`
pub trait Layer<B> {
    /// The resulting backend type after applying this layer.
    type Backend;

    /// Wrap the given backend with this layer's functionality.
    fn layer(self, backend: B) -> Self::Backend;
}

/// Extension trait for fluent layer composition.
///
/// Provides `.layer()` on any [`Os`] backend.
pub trait LayerExt: Os + Sized {
    /// Apply a layer to this backend.
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Backend {
        layer.layer(self)
    }
}

impl<B: Os> LayerExt for B {}

// =============================================================================
// ReadOnly
// =============================================================================

/// Layer producing [`ReadOnly`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyLayer;

impl<B> Layer<B> for ReadOnlyLayer {
    type Backend = ReadOnly<B>;

    fn layer(self, backend: B) -> Self::Backend {
        ReadOnly { inner: backend }
    }
}

/// Rejects every write; reads and the environment pass through.
#[derive(Debug, Clone)]
pub struct ReadOnly<B> {
    inner: B,
}

impl<B> ReadOnly<B> {
    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: OsStat> OsStat for ReadOnly<B> {
    fn stat(&self, path: &Path) -> Result<Stats, OsError> {
        self.inner.stat(path)
    }

    fn lstat(&self, path: &Path) -> Result<Stats, OsError> {
        self.inner.lstat(path)
    }
}

impl<B: OsRead> OsRead for ReadOnly<B> {
    fn read_file(&self, path: &Path) -> Result<Data, OsError> {
        self.inner.read_file(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, OsError> {
        self.inner.read_dir(path)
    }
}

impl<B: Send + Sync> OsWrite for ReadOnly<B> {
    fn write_file(&self, path: &Path, _content: Content<'_>) -> Result<(), OsError> {
        tracing::debug!(path = %path.display(), "write rejected by read-only layer");
        Err(OsError::PermissionDenied {
            path: path.to_path_buf(),
            operation: "write_file",
        })
    }
}

impl<B: OsEnv> OsEnv for ReadOnly<B> {
    fn env(&self) -> Env {
        self.inner.env()
    }
}

// =============================================================================
// Rooted
// =============================================================================

/// Layer producing [`Rooted`].
#[derive(Debug, Clone)]
pub struct RootedLayer {
    root: PathBuf,
}

impl RootedLayer {
    /// Confine paths beneath `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl<B> Layer<B> for RootedLayer {
    type Backend = Rooted<B>;

    fn layer(self, backend: B) -> Self::Backend {
        Rooted {
            inner: backend,
            root: self.root,
        }
    }
}

/// Resolves every path beneath a fixed root.
///
/// Accepted paths are relative, non-empty and contain no `..`, root or
/// prefix components and no NUL byte. `.` components are dropped, so `.`
/// alone names the root itself. Anything else fails with
/// [`OsError::PermissionDenied`] before the inner backend is called.
///
/// Errors from the inner backend are reported against the caller's path,
/// never the joined one, so the root does not leak through failures.
///
/// Confinement is lexical: a symlink inside the root that points outside it
/// is still followed.
#[derive(Debug, Clone)]
pub struct Rooted<B> {
    inner: B,
    root: PathBuf,
}

impl<B> Rooted<B> {
    /// The confinement root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Map a caller path onto the root, or reject it.
    pub fn resolve(&self, operation: &'static str, path: &Path) -> Result<PathBuf, OsError> {
        let denied = || {
            tracing::debug!(operation, path = %path.display(), "path escapes root");
            OsError::PermissionDenied {
                path: path.to_path_buf(),
                operation,
            }
        };

        if path.as_os_str().is_empty() || path.as_os_str().as_encoded_bytes().contains(&0) {
            return Err(denied());
        }

        let mut resolved = self.root.clone();
        for component in path.components() {
            match component {
                Component::Normal(segment) => resolved.push(segment),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(denied());
                }
            }
        }
        Ok(resolved)
    }

    fn unroot(&self, mut entry: DirEntry) -> DirEntry {
        if let Ok(rel) = entry.path.strip_prefix(&self.root) {
            entry.path = if rel.as_os_str().is_empty() {
                PathBuf::from(OsStr::new("."))
            } else {
                rel.to_path_buf()
            };
        }
        entry
    }
}

impl<B: OsStat> OsStat for Rooted<B> {
    fn stat(&self, path: &Path) -> Result<Stats, OsError> {
        self.inner
            .stat(&self.resolve("stat", path)?)
            .map_err(|e| e.with_path(path))
    }

    fn lstat(&self, path: &Path) -> Result<Stats, OsError> {
        self.inner
            .lstat(&self.resolve("lstat", path)?)
            .map_err(|e| e.with_path(path))
    }
}

impl<B: OsRead> OsRead for Rooted<B> {
    fn read_file(&self, path: &Path) -> Result<Data, OsError> {
        self.inner
            .read_file(&self.resolve("read_file", path)?)
            .map_err(|e| e.with_path(path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, OsError> {
        let entries = self
            .inner
            .read_dir(&self.resolve("read_dir", path)?)
            .map_err(|e| e.with_path(path))?;
        Ok(entries.into_iter().map(|e| self.unroot(e)).collect())
    }
}

impl<B: OsWrite> OsWrite for Rooted<B> {
    fn write_file(&self, path: &Path, content: Content<'_>) -> Result<(), OsError> {
        self.inner
            .write_file(&self.resolve("write_file", path)?, content)
            .map_err(|e| e.with_path(path))
    }
}

impl<B: OsEnv> OsEnv for Rooted<B> {
    fn env(&self) -> Env {
        self.inner.env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, FileKind, mode};
    use std::sync::Mutex;

    /// Records the paths it is called with.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<PathBuf>>,
        missing: bool,
    }

    impl Recorder {
        /// Every call fails with `NotFound` at the path it received.
        fn missing() -> Self {
            Self {
                missing: true,
                ..Self::default()
            }
        }

        fn record(&self, path: &Path) -> Result<(), OsError> {
            self.seen.lock().unwrap().push(path.to_path_buf());
            if self.missing {
                return Err(OsError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Ok(())
        }

        fn seen(&self) -> Vec<PathBuf> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl OsStat for Recorder {
        fn stat(&self, path: &Path) -> Result<Stats, OsError> {
            self.record(path)?;
            Ok(Stats {
                dev: 0,
                ino: 0,
                mode: mode::S_IFREG | 0o644,
                nlink: 1,
                uid: 0,
                gid: 0,
                rdev: 0,
                size: 0,
                blksize: 0,
                blocks: 0,
                atime: 0.0,
                mtime: 0.0,
                ctime: 0.0,
            })
        }

        fn lstat(&self, path: &Path) -> Result<Stats, OsError> {
            self.stat(path)
        }
    }

    impl OsRead for Recorder {
        fn read_file(&self, path: &Path) -> Result<Data, OsError> {
            self.record(path)?;
            Ok(Data::default())
        }

        fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, OsError> {
            self.record(path)?;
            Ok(vec![DirEntry {
                name: "child".into(),
                path: path.join("child"),
                kind: FileKind::File,
            }])
        }
    }

    impl OsWrite for Recorder {
        fn write_file(&self, path: &Path, _: Content<'_>) -> Result<(), OsError> {
            self.record(path)
        }
    }

    impl OsEnv for Recorder {
        fn env(&self) -> Env {
            Env::default()
        }
    }

    #[test]
    fn layer_ext_is_auto_implemented() {
        fn _check<B: Os + LayerExt>() {}
    }

    #[test]
    fn read_only_rejects_writes() {
        let os = Recorder::default().layer(ReadOnlyLayer);
        let err = os.write_file(Path::new("f"), "x".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(os.inner().seen().is_empty());
    }

    #[test]
    fn read_only_passes_reads() {
        let os = Recorder::default().layer(ReadOnlyLayer);
        os.read_file(Path::new("f")).unwrap();
        os.stat(Path::new("g")).unwrap();
        assert_eq!(os.inner().seen(), vec![PathBuf::from("f"), PathBuf::from("g")]);
    }

    #[test]
    fn rooted_joins_relative_paths() {
        let os = Recorder::default().layer(RootedLayer::new("/srv"));
        os.read_file(Path::new("./a/./b.txt")).unwrap();
        os.write_file(Path::new("c"), "x".into()).unwrap();
        assert_eq!(
            os.inner().seen(),
            vec![PathBuf::from("/srv/a/b.txt"), PathBuf::from("/srv/c")]
        );
    }

    #[test]
    fn rooted_dot_is_root() {
        let os = Recorder::default().layer(RootedLayer::new("/srv"));
        os.stat(Path::new(".")).unwrap();
        assert_eq!(os.inner().seen(), vec![PathBuf::from("/srv")]);
    }

    #[test]
    fn rooted_rejects_escapes() {
        let os = Recorder::default().layer(RootedLayer::new("/srv"));
        for bad in ["", "../etc/passwd", "a/../../b", "/etc/passwd"] {
            let err = os.read_file(Path::new(bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PermissionDenied, "{bad:?}");
        }
        assert!(os.inner().seen().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn rooted_rejects_nul() {
        use std::os::unix::ffi::OsStrExt;
        let os = Recorder::default().layer(RootedLayer::new("/srv"));
        let path = Path::new(OsStr::from_bytes(b"a\0b"));
        assert!(os.stat(path).is_err());
    }

    #[test]
    fn rooted_read_dir_reports_relative_paths() {
        let os = Recorder::default().layer(RootedLayer::new("/srv"));
        let entries = os.read_dir(Path::new("sub")).unwrap();
        assert_eq!(entries[0].path, PathBuf::from("sub/child"));
    }

    #[test]
    fn rooted_errors_name_the_caller_path() {
        let os = Recorder::missing().layer(RootedLayer::new("/srv"));

        let err = os.read_file(Path::new("./a/b")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.path(), Path::new("./a/b"));

        for err in [
            os.stat(Path::new("s")).unwrap_err(),
            os.lstat(Path::new("s")).unwrap_err(),
            os.read_dir(Path::new("s")).unwrap_err(),
            os.write_file(Path::new("s"), "x".into()).unwrap_err(),
        ] {
            assert_eq!(err.path(), Path::new("s"));
            assert!(!err.to_string().contains("/srv"), "{err}");
        }

        assert_eq!(os.inner().seen()[0], PathBuf::from("/srv/a/b"));
    }

    #[test]
    fn layers_compose() {
        let os = Recorder::default()
            .layer(RootedLayer::new("/srv"))
            .layer(ReadOnlyLayer);
        assert!(os.write_file(Path::new("a"), "x".into()).is_err());
        os.read_file(Path::new("a")).unwrap();
        assert_eq!(os.inner().inner().seen(), vec![PathBuf::from("/srv/a")]);

        fn _takes_os<T: Os>(_: &T) {}
        _takes_os(&os);
    }
}
