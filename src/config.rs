//! Backend configuration.
//!
//! [`OsConfig`] can be built in code or read from `HOSTOS_*` environment
//! variables with [`OsConfig::from_env`]:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `HOSTOS_ENV_SNAPSHOT` | `init`, `call` | `init` |
//! | `HOSTOS_MAX_READ_BYTES` | bytes, `0` = unlimited | unlimited |
//! | `HOSTOS_MAX_WRITE_BYTES` | bytes, `0` = unlimited | unlimited |
//! | `HOSTOS_SYNC_ON_WRITE` | `1`/`true`/`yes`, `0`/`false`/`no` | `false` |
//!
//! Values that fail to parse fall back to the default.

/// When the environment snapshot returned by `env()` is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EnvSnapshot {
    /// Once, when the backend is constructed.
    #[default]
    Init,
    /// On every `env()` call.
    Call,
}

/// Configuration for [`NativeOs`](crate::NativeOs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OsConfig {
    /// When the environment is captured.
    pub env_snapshot: EnvSnapshot,
    /// Largest file `read_file` will load. `None` means unlimited.
    pub max_read_bytes: Option<u64>,
    /// Largest payload `write_file` will accept. `None` means unlimited.
    pub max_write_bytes: Option<u64>,
    /// Call `sync_all` after every write.
    pub sync_on_write: bool,
}

impl OsConfig {
    /// Read the configuration from `HOSTOS_*` process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            env_snapshot: lookup("HOSTOS_ENV_SNAPSHOT")
                .and_then(|v| parse_snapshot(&v))
                .unwrap_or(defaults.env_snapshot),
            max_read_bytes: lookup("HOSTOS_MAX_READ_BYTES")
                .and_then(|v| parse_limit(&v))
                .unwrap_or(defaults.max_read_bytes),
            max_write_bytes: lookup("HOSTOS_MAX_WRITE_BYTES")
                .and_then(|v| parse_limit(&v))
                .unwrap_or(defaults.max_write_bytes),
            sync_on_write: lookup("HOSTOS_SYNC_ON_WRITE")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.sync_on_write),
        }
    }

    /// Set the environment snapshot mode.
    pub fn env_snapshot(mut self, mode: EnvSnapshot) -> Self {
        self.env_snapshot = mode;
        self
    }

    /// Limit `read_file` to files of at most `limit` bytes.
    pub fn max_read_bytes(mut self, limit: u64) -> Self {
        self.max_read_bytes = Some(limit);
        self
    }

    /// Limit `write_file` to payloads of at most `limit` bytes.
    pub fn max_write_bytes(mut self, limit: u64) -> Self {
        self.max_write_bytes = Some(limit);
        self
    }

    /// Enable or disable `sync_all` after writes.
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.sync_on_write = enabled;
        self
    }
}

fn parse_snapshot(v: &str) -> Option<EnvSnapshot> {
    match v.trim() {
        "init" | "INIT" => Some(EnvSnapshot::Init),
        "call" | "CALL" => Some(EnvSnapshot::Call),
        _ => None,
    }
}

// Outer None: unparsable. Some(None): explicit 0, unlimited.
fn parse_limit(v: &str) -> Option<Option<u64>> {
    v.trim()
        .parse::<u64>()
        .ok()
        .map(|n| if n == 0 { None } else { Some(n) })
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = OsConfig::from_lookup(|_| None);
        assert_eq!(config, OsConfig::default());
        assert_eq!(config.env_snapshot, EnvSnapshot::Init);
        assert_eq!(config.max_read_bytes, None);
        assert!(!config.sync_on_write);
    }

    #[test]
    fn reads_all_variables() {
        let config = OsConfig::from_lookup(lookup_from(&[
            ("HOSTOS_ENV_SNAPSHOT", "call"),
            ("HOSTOS_MAX_READ_BYTES", "1024"),
            ("HOSTOS_MAX_WRITE_BYTES", "2048"),
            ("HOSTOS_SYNC_ON_WRITE", "yes"),
        ]));
        assert_eq!(config.env_snapshot, EnvSnapshot::Call);
        assert_eq!(config.max_read_bytes, Some(1024));
        assert_eq!(config.max_write_bytes, Some(2048));
        assert!(config.sync_on_write);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let config = OsConfig::from_lookup(lookup_from(&[("HOSTOS_MAX_READ_BYTES", "0")]));
        assert_eq!(config.max_read_bytes, None);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let config = OsConfig::from_lookup(lookup_from(&[
            ("HOSTOS_ENV_SNAPSHOT", "sometimes"),
            ("HOSTOS_MAX_WRITE_BYTES", "-5"),
            ("HOSTOS_SYNC_ON_WRITE", "maybe"),
        ]));
        assert_eq!(config, OsConfig::default());
    }

    #[test]
    fn builder_setters() {
        let config = OsConfig::default()
            .env_snapshot(EnvSnapshot::Call)
            .max_read_bytes(10)
            .max_write_bytes(20)
            .sync_on_write(true);
        assert_eq!(config.max_read_bytes, Some(10));
        assert_eq!(config.max_write_bytes, Some(20));
        assert!(config.sync_on_write);
    }
}
