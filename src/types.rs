//! Core types for the host OS facade.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ffi::OsString;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// File type mask and type bits of `st_mode` (POSIX values).
pub mod mode {
    /// Mask for the file type bits.
    pub const S_IFMT: u32 = 0o170000;
    /// Socket.
    pub const S_IFSOCK: u32 = 0o140000;
    /// Symbolic link.
    pub const S_IFLNK: u32 = 0o120000;
    /// Regular file.
    pub const S_IFREG: u32 = 0o100000;
    /// Block device.
    pub const S_IFBLK: u32 = 0o060000;
    /// Directory.
    pub const S_IFDIR: u32 = 0o040000;
    /// Character device.
    pub const S_IFCHR: u32 = 0o020000;
    /// FIFO.
    pub const S_IFIFO: u32 = 0o010000;
}

/// Type of a filesystem entry, decoded from the mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Character device.
    CharDevice,
    /// Block device.
    BlockDevice,
    /// Named pipe.
    Fifo,
    /// Symbolic link.
    Symlink,
    /// Unix domain socket.
    Socket,
    /// Type bits not recognized on this platform.
    Unknown,
}

impl FileKind {
    /// Decode the `S_IFMT` bits of a raw mode.
    pub const fn from_mode(raw: u32) -> Self {
        match raw & mode::S_IFMT {
            mode::S_IFREG => FileKind::File,
            mode::S_IFDIR => FileKind::Directory,
            mode::S_IFCHR => FileKind::CharDevice,
            mode::S_IFBLK => FileKind::BlockDevice,
            mode::S_IFIFO => FileKind::Fifo,
            mode::S_IFLNK => FileKind::Symlink,
            mode::S_IFSOCK => FileKind::Socket,
            _ => FileKind::Unknown,
        }
    }

    /// Classify a [`std::fs::FileType`].
    pub fn from_std(file_type: std::fs::FileType) -> Self {
        if file_type.is_file() {
            return FileKind::File;
        }
        if file_type.is_dir() {
            return FileKind::Directory;
        }
        if file_type.is_symlink() {
            return FileKind::Symlink;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_char_device() {
                return FileKind::CharDevice;
            }
            if file_type.is_block_device() {
                return FileKind::BlockDevice;
            }
            if file_type.is_fifo() {
                return FileKind::Fifo;
            }
            if file_type.is_socket() {
                return FileKind::Socket;
            }
        }
        FileKind::Unknown
    }
}

/// Immutable metadata snapshot of one path, taken at query time.
///
/// Field names follow `struct stat`. Timestamps are seconds since the Unix
/// epoch; the fractional part carries the sub-second precision the platform
/// reports. The snapshot never tracks later changes to the file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Device containing the entry.
    pub dev: u64,
    /// Inode number.
    pub ino: u64,
    /// File type and permission bits.
    pub mode: u32,
    /// Number of hard links.
    pub nlink: u64,
    /// Owner user id.
    pub uid: u32,
    /// Owner group id.
    pub gid: u32,
    /// Device id, for special files.
    pub rdev: u64,
    /// Size in bytes.
    pub size: u64,
    /// Preferred I/O block size.
    pub blksize: u64,
    /// Number of 512-byte blocks allocated.
    pub blocks: u64,
    /// Last access time.
    pub atime: f64,
    /// Last modification time.
    pub mtime: f64,
    /// Last status change time.
    pub ctime: f64,
}

impl Stats {
    /// Build a snapshot from [`std::fs::Metadata`].
    #[cfg(unix)]
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
            mode: metadata.mode(),
            nlink: metadata.nlink(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            rdev: metadata.rdev(),
            size: metadata.size(),
            blksize: metadata.blksize(),
            blocks: metadata.blocks(),
            atime: epoch_seconds(metadata.atime(), metadata.atime_nsec()),
            mtime: epoch_seconds(metadata.mtime(), metadata.mtime_nsec()),
            ctime: epoch_seconds(metadata.ctime(), metadata.ctime_nsec()),
        }
    }

    /// Build a snapshot from [`std::fs::Metadata`].
    ///
    /// The mode is synthesized from the file type and read-only flag. Fields
    /// without a portable source are zero; `ctime` mirrors `mtime`.
    #[cfg(not(unix))]
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        let (type_bits, perm_bits) = match FileKind::from_std(metadata.file_type()) {
            FileKind::File => (mode::S_IFREG, 0o644),
            FileKind::Directory => (mode::S_IFDIR, 0o755),
            FileKind::Symlink => (mode::S_IFLNK, 0o777),
            _ => (0, 0o644),
        };
        let perm_bits = if metadata.permissions().readonly() {
            perm_bits & !0o222
        } else {
            perm_bits
        };
        let mtime = system_time_seconds(metadata.modified());

        Self {
            dev: 0,
            ino: 0,
            mode: type_bits | perm_bits,
            nlink: 1,
            uid: 0,
            gid: 0,
            rdev: 0,
            size: metadata.len(),
            blksize: 0,
            blocks: 0,
            atime: system_time_seconds(metadata.accessed()),
            mtime,
            ctime: mtime,
        }
    }

    /// The file type encoded in [`mode`](Self::mode).
    #[inline]
    pub fn kind(&self) -> FileKind {
        FileKind::from_mode(self.mode)
    }

    /// Permission bits only (`mode & 0o7777`).
    #[inline]
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    /// Returns `true` for a regular file.
    #[inline]
    pub fn is_file(&self) -> bool {
        self.kind() == FileKind::File
    }

    /// Returns `true` for a directory.
    #[inline]
    pub fn is_directory(&self) -> bool {
        self.kind() == FileKind::Directory
    }

    /// Returns `true` for a character device.
    #[inline]
    pub fn is_character_device(&self) -> bool {
        self.kind() == FileKind::CharDevice
    }

    /// Returns `true` for a block device.
    #[inline]
    pub fn is_block_device(&self) -> bool {
        self.kind() == FileKind::BlockDevice
    }

    /// Returns `true` for a named pipe.
    #[inline]
    pub fn is_fifo(&self) -> bool {
        self.kind() == FileKind::Fifo
    }

    /// Returns `true` for a symbolic link. Only an `lstat` snapshot can be one.
    #[inline]
    pub fn is_symbolic_link(&self) -> bool {
        self.kind() == FileKind::Symlink
    }

    /// Returns `true` for a socket.
    #[inline]
    pub fn is_socket(&self) -> bool {
        self.kind() == FileKind::Socket
    }
}

#[cfg(unix)]
fn epoch_seconds(secs: i64, nsec: i64) -> f64 {
    secs as f64 + nsec as f64 / 1_000_000_000.0
}

#[cfg(not(unix))]
fn system_time_seconds(time: std::io::Result<std::time::SystemTime>) -> f64 {
    use std::time::UNIX_EPOCH;

    match time {
        Ok(t) => match t.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(before) => -before.duration().as_secs_f64(),
        },
        Err(_) => 0.0,
    }
}

/// Whole-file contents. Binary-safe; no text encoding is assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Data(Vec<u8>);

impl Data {
    /// Wrap raw bytes.
    #[inline]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the bytes.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Decode as UTF-8, replacing invalid sequences.
    pub fn to_text_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl Deref for Data {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Data {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<Data> for Vec<u8> {
    fn from(data: Data) -> Self {
        data.0
    }
}

/// Content accepted by `write_file`: raw bytes or text.
///
/// Text is written as UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    /// Raw bytes, written unchanged.
    Bytes(&'a [u8]),
    /// Text, encoded as UTF-8.
    Text(&'a str),
}

impl<'a> Content<'a> {
    /// The bytes that will reach the file.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Content::Bytes(b) => b,
            Content::Text(s) => s.as_bytes(),
        }
    }

    /// Length in bytes after encoding.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns `true` if nothing would be written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a [u8]> for Content<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Content::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Content<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Content::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Content<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Content::Bytes(bytes)
    }
}

impl<'a> From<&'a Data> for Content<'a> {
    fn from(data: &'a Data) -> Self {
        Content::Bytes(data.as_bytes())
    }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(text: &'a str) -> Self {
        Content::Text(text)
    }
}

impl<'a> From<&'a String> for Content<'a> {
    fn from(text: &'a String) -> Self {
        Content::Text(text)
    }
}

/// Read-only snapshot of environment variables.
///
/// Cloning is cheap; all clones share one immutable map. Nothing done with
/// an `Env` reaches the process environment. Use [`into_map`](Self::into_map)
/// for a private mutable copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Env(Arc<BTreeMap<String, String>>);

impl Env {
    /// Capture the current process environment.
    ///
    /// Names and values that are not valid Unicode are converted lossily.
    /// Two distinct non-Unicode names can convert to the same key; the first
    /// one in process order wins and the collision is logged at `debug`.
    pub fn capture() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    fn from_os_pairs(pairs: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        let mut map = BTreeMap::new();
        for (name, value) in pairs {
            match map.entry(name.to_string_lossy().into_owned()) {
                Entry::Vacant(slot) => {
                    slot.insert(value.to_string_lossy().into_owned());
                }
                Entry::Occupied(slot) => {
                    tracing::debug!(
                        name = %slot.key(),
                        "environment name collides after lossy conversion, keeping first"
                    );
                }
            }
        }
        Self::from_map(map)
    }

    /// Build a snapshot from an explicit map.
    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        Self(Arc::new(map))
    }

    /// Value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` is set.
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Variable names, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(name, value)` pairs, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no variables are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A private, mutable copy of the mapping.
    pub fn into_map(self) -> BTreeMap<String, String> {
        Arc::unwrap_or_clone(self.0)
    }
}

impl FromIterator<(String, String)> for Env {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

/// A directory entry returned from `read_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirEntry {
    /// Name of the entry (filename only, not full path).
    pub name: String,
    /// Full path to the entry.
    pub path: PathBuf,
    /// Type of the entry, not following symlinks.
    pub kind: FileKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with_mode(raw: u32) -> Stats {
        Stats {
            dev: 0,
            ino: 0,
            mode: raw,
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
        }
    }

    fn predicates(s: &Stats) -> [bool; 7] {
        [
            s.is_file(),
            s.is_directory(),
            s.is_character_device(),
            s.is_block_device(),
            s.is_fifo(),
            s.is_symbolic_link(),
            s.is_socket(),
        ]
    }

    #[test]
    fn exactly_one_predicate_per_known_type() {
        for bits in [
            mode::S_IFREG,
            mode::S_IFDIR,
            mode::S_IFCHR,
            mode::S_IFBLK,
            mode::S_IFIFO,
            mode::S_IFLNK,
            mode::S_IFSOCK,
        ] {
            let s = stats_with_mode(bits | 0o644);
            let true_count = predicates(&s).iter().filter(|&&b| b).count();
            assert_eq!(true_count, 1, "mode {bits:o}");
        }
    }

    #[test]
    fn unknown_type_bits_match_nothing() {
        let s = stats_with_mode(0o644);
        assert_eq!(s.kind(), FileKind::Unknown);
        assert!(predicates(&s).iter().all(|&b| !b));
    }

    #[test]
    fn permissions_strip_type_bits() {
        let s = stats_with_mode(mode::S_IFDIR | 0o755);
        assert_eq!(s.permissions(), 0o755);
        assert!(s.is_directory());
    }

    #[test]
    fn content_text_is_utf8() {
        let c = Content::from("héllo");
        assert_eq!(c.as_bytes(), "héllo".as_bytes());
        assert_eq!(c.len(), 6);
    }

    #[test]
    fn content_bytes_are_unchanged() {
        let raw = vec![0u8, 159, 146, 150];
        let c = Content::from(&raw);
        assert_eq!(c.as_bytes(), &raw[..]);
        assert!(!c.is_empty());
    }

    #[test]
    fn data_is_binary_safe() {
        let data = Data::from(vec![0xff, 0x00, 0xfe]);
        assert_eq!(data.len(), 3);
        assert_eq!(&data[..], &[0xff, 0x00, 0xfe]);
        assert_eq!(data.into_vec(), vec![0xff, 0x00, 0xfe]);
    }

    #[test]
    fn env_copy_is_local() {
        let env: Env = [("A".to_string(), "1".to_string())].into_iter().collect();
        let shared = env.clone();
        let mut local = env.into_map();
        local.insert("B".into(), "2".into());
        assert_eq!(shared.len(), 1);
        assert!(!shared.contains_key("B"));
        assert_eq!(shared.get("A"), Some("1"));
    }

    #[cfg(unix)]
    #[test]
    fn env_lossy_name_collision_keeps_first() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        fn os(bytes: &[u8]) -> OsString {
            OsStr::from_bytes(bytes).to_os_string()
        }
        let env = Env::from_os_pairs([
            (os(b"K\xff"), os(b"first")),
            (os(b"K\xfe"), os(b"second")),
            (os(b"PLAIN"), os(b"v\xff")),
        ]);

        assert_eq!(env.len(), 2);
        assert_eq!(env.get("K\u{FFFD}"), Some("first"));
        assert_eq!(env.get("PLAIN"), Some("v\u{FFFD}"));
    }

    #[test]
    fn env_iterates_sorted() {
        let env: Env = [("b", "2"), ("a", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(env.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(env.iter().next(), Some(("a", "1")));
    }
}
