//! Backend over the host operating system.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::{
    Content, Data, DirEntry, Env, EnvSnapshot, FileKind, OsConfig, OsEnv, OsError, OsRead, OsStat,
    OsWrite, Stats,
};

/// The facade over `std::fs` and `std::env`.
///
/// Paths are passed to the OS unchanged, so relative paths resolve against
/// the process working directory. Every call opens its own handle and drops
/// it before returning, on success and on failure alike.
///
/// # Example
///
/// ```rust
/// use hostos::{NativeOs, OsRead, OsWrite};
///
/// let dir = std::env::temp_dir().join(format!("hostos-doc-{}", std::process::id()));
/// std::fs::create_dir_all(&dir).unwrap();
/// let path = dir.join("hello.txt");
///
/// let os = NativeOs::new();
/// os.write_file(&path, "hello".into()).unwrap();
/// assert_eq!(os.read_file(&path).unwrap().as_bytes(), b"hello");
/// # std::fs::remove_dir_all(&dir).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NativeOs {
    config: OsConfig,
    env: Env,
}

impl NativeOs {
    /// Backend with the default configuration.
    pub fn new() -> Self {
        Self::with_config(OsConfig::default())
    }

    /// Backend with an explicit configuration.
    ///
    /// In [`EnvSnapshot::Init`] mode the environment is captured here.
    pub fn with_config(config: OsConfig) -> Self {
        let env = match config.env_snapshot {
            EnvSnapshot::Init => Env::capture(),
            EnvSnapshot::Call => Env::default(),
        };
        Self { config, env }
    }

    /// Backend configured from `HOSTOS_*` environment variables.
    pub fn from_env() -> Self {
        Self::with_config(OsConfig::from_env())
    }

    /// The active configuration.
    pub fn config(&self) -> &OsConfig {
        &self.config
    }

    fn read_whole(&self, path: &Path) -> Result<Data, OsError> {
        const OP: &str = "read_file";

        let mut file = File::open(path).map_err(|e| open_error(OP, path, e))?;
        let metadata = file.metadata().map_err(|e| OsError::from_io(OP, path, e))?;
        if metadata.is_dir() {
            return Err(OsError::IsADirectory {
                path: path.to_path_buf(),
                operation: OP,
            });
        }

        let size = metadata.len();
        if let Some(limit) = self.config.max_read_bytes {
            if size > limit {
                return Err(too_large(OP, path, size, limit));
            }
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(usize::try_from(size).unwrap_or(usize::MAX))
            .map_err(|_| OsError::from_io(OP, path, io::ErrorKind::OutOfMemory.into()))?;

        match self.config.max_read_bytes {
            // One byte past the limit detects files that grew after fstat.
            Some(limit) => {
                file.take(limit.saturating_add(1))
                    .read_to_end(&mut buf)
                    .map_err(|e| OsError::from_io(OP, path, e))?;
                if buf.len() as u64 > limit {
                    return Err(too_large(OP, path, buf.len() as u64, limit));
                }
            }
            None => {
                file.read_to_end(&mut buf)
                    .map_err(|e| OsError::from_io(OP, path, e))?;
            }
        }
        Ok(Data::new(buf))
    }

    fn write_whole(&self, path: &Path, bytes: &[u8]) -> Result<(), OsError> {
        const OP: &str = "write_file";

        if let Some(limit) = self.config.max_write_bytes {
            if bytes.len() as u64 > limit {
                return Err(too_large(OP, path, bytes.len() as u64, limit));
            }
        }

        let mut file = File::create(path).map_err(|e| open_error(OP, path, e))?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|e| OsError::from_io(OP, path, e))?;
        if self.config.sync_on_write {
            file.sync_all().map_err(|e| OsError::from_io(OP, path, e))?;
        }
        Ok(())
    }

    fn list(&self, path: &Path) -> Result<Vec<DirEntry>, OsError> {
        const OP: &str = "read_dir";

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| OsError::from_io(OP, path, e))? {
            let entry = entry.map_err(|e| OsError::from_io(OP, path, e))?;
            let kind = entry
                .file_type()
                .map(FileKind::from_std)
                .map_err(|e| OsError::from_io(OP, &entry.path(), e))?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

impl Default for NativeOs {
    fn default() -> Self {
        Self::new()
    }
}

impl OsStat for NativeOs {
    fn stat(&self, path: &Path) -> Result<Stats, OsError> {
        let result = std::fs::metadata(path)
            .map(|m| Stats::from_metadata(&m))
            .map_err(|e| OsError::from_io("stat", path, e));
        logged("stat", path, result, |_| None)
    }

    fn lstat(&self, path: &Path) -> Result<Stats, OsError> {
        let result = std::fs::symlink_metadata(path)
            .map(|m| Stats::from_metadata(&m))
            .map_err(|e| OsError::from_io("lstat", path, e));
        logged("lstat", path, result, |_| None)
    }
}

impl OsRead for NativeOs {
    fn read_file(&self, path: &Path) -> Result<Data, OsError> {
        logged("read_file", path, self.read_whole(path), |d| Some(d.len()))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, OsError> {
        logged("read_dir", path, self.list(path), |v| Some(v.len()))
    }
}

impl OsWrite for NativeOs {
    fn write_file(&self, path: &Path, content: Content<'_>) -> Result<(), OsError> {
        let bytes = content.as_bytes();
        logged("write_file", path, self.write_whole(path, bytes), |_| {
            Some(bytes.len())
        })
    }
}

impl OsEnv for NativeOs {
    fn env(&self) -> Env {
        match self.config.env_snapshot {
            EnvSnapshot::Init => self.env.clone(),
            EnvSnapshot::Call => Env::capture(),
        }
    }
}

// An open that is refused on a path that turns out to be a directory is
// reported as IsADirectory. Windows answers "access denied" for any
// directory; Unix answers EACCES for a directory without read permission.
fn open_error(operation: &'static str, path: &Path, error: io::Error) -> OsError {
    if error.kind() == io::ErrorKind::PermissionDenied
        && std::fs::metadata(path).is_ok_and(|m| m.is_dir())
    {
        return OsError::IsADirectory {
            path: path.to_path_buf(),
            operation,
        };
    }
    OsError::from_io(operation, path, error)
}

fn too_large(operation: &'static str, path: &Path, size: u64, limit: u64) -> OsError {
    OsError::TooLarge {
        path: path.to_path_buf(),
        operation,
        size,
        limit,
    }
}

fn logged<T>(
    operation: &'static str,
    path: &Path,
    result: Result<T, OsError>,
    size: impl FnOnce(&T) -> Option<usize>,
) -> Result<T, OsError> {
    match &result {
        Ok(value) => match size(value) {
            Some(bytes) => trace!(operation, path = %path.display(), bytes, "ok"),
            None => trace!(operation, path = %path.display(), "ok"),
        },
        Err(err) => debug!(
            operation,
            path = %path.display(),
            kind = %err.kind(),
            error = %err,
            "failed"
        ),
    }
    result
}
