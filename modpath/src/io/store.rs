//! Durable, system-wide storage for path-list variables.
//!
//! On Windows the value lives in the machine environment key of the
//! registry. Elsewhere it lives in an `/etc/environment`-style file of
//! `NAME="value"` lines. Both replace the whole value in one step.

#[cfg(any(test, feature = "test-support"))]
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(any(test, feature = "test-support"))]
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::io::config::ModpathConfig;

/// Registry key holding machine-wide environment variables.
pub const MACHINE_ENVIRONMENT_KEY: &str =
    r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";

/// Write access to the durable environment store.
pub trait DurableStore {
    /// Replace the stored value of `key` with `value`.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Machine environment in the Windows registry (`HKEY_LOCAL_MACHINE`).
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryStore;

#[cfg(windows)]
impl DurableStore for RegistryStore {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        let env_key = windows_registry::LOCAL_MACHINE
            .create(MACHINE_ENVIRONMENT_KEY)
            .with_context(|| format!(r"open HKLM\{MACHINE_ENVIRONMENT_KEY}"))?;
        env_key
            .set_string(key, value)
            .with_context(|| format!(r"write HKLM\{MACHINE_ENVIRONMENT_KEY}\{key}"))?;
        info!(key, bytes = value.len(), "wrote registry value");
        Ok(())
    }
}

/// `NAME="value"` lines in a plain file, as read by `pam_env`.
#[derive(Debug, Clone)]
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DurableStore for EnvFileStore {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", self.path.display()));
            }
        };
        let updated = upsert_assignment(&contents, key, value)?;
        write_atomic(&self.path, &updated)?;
        info!(path = %self.path.display(), key, "wrote environment file");
        Ok(())
    }
}

/// Values held in memory, for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl DurableStore for MemoryStore {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The store backing the system-wide environment on this platform.
pub fn platform_store(config: &ModpathConfig) -> Box<dyn DurableStore> {
    #[cfg(windows)]
    {
        let _ = config;
        Box::new(RegistryStore)
    }
    #[cfg(not(windows))]
    {
        Box::new(EnvFileStore::new(&config.store_file))
    }
}

/// Replace the `key=` line in `contents`, or append one if absent.
///
/// Only the first assignment is rewritten; later duplicates are dropped so
/// the file ends up with a single definition.
fn upsert_assignment(contents: &str, key: &str, value: &str) -> Result<String> {
    if value.contains(['"', '\n']) {
        return Err(anyhow!(
            "value for {key} contains a quote or newline and cannot be stored"
        ));
    }
    let line = format!("{key}=\"{value}\"");
    let mut lines = Vec::new();
    let mut replaced = false;

    for existing in contents.lines() {
        if assigns(existing, key) {
            if !replaced {
                lines.push(line.clone());
                replaced = true;
            }
            continue;
        }
        lines.push(existing.to_string());
    }

    if !replaced {
        lines.push(line);
    }

    let mut buf = lines.join("\n");
    buf.push('\n');
    Ok(buf)
}

fn assigns(line: &str, key: &str) -> bool {
    let trimmed = line.trim_start();
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    trimmed
        .split_once('=')
        .is_some_and(|(name, _)| name.trim_end() == key)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("store path has no file name {}", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".modpath.tmp");
    let tmp_path = parent.join(tmp_name);
    debug!(path = %tmp_path.display(), "writing temp store file");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp store {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace store {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_appends_when_missing() {
        let out = upsert_assignment("LANG=\"C\"\n", "PATH", "/bin:/usr/bin").expect("upsert");
        assert_eq!(out, "LANG=\"C\"\nPATH=\"/bin:/usr/bin\"\n");
    }

    #[test]
    fn upsert_replaces_existing_and_drops_duplicates() {
        let contents = "PATH=\"/old\"\n# comment\nexport PATH=/older\nLANG=C\n";
        let out = upsert_assignment(contents, "PATH", "/new").expect("upsert");
        assert_eq!(out, "PATH=\"/new\"\n# comment\nLANG=C\n");
    }

    #[test]
    fn upsert_ignores_prefixed_names() {
        let out = upsert_assignment("PATHEXT=\".x\"\n", "PATH", "/bin").expect("upsert");
        assert_eq!(out, "PATHEXT=\".x\"\nPATH=\"/bin\"\n");
    }

    #[test]
    fn upsert_rejects_quotes() {
        let err = upsert_assignment("", "PATH", "/a\"b").unwrap_err();
        assert!(err.to_string().contains("cannot be stored"));
    }

    #[test]
    fn env_file_store_creates_and_rewrites_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = EnvFileStore::new(temp.path().join("environment"));

        store.write("PATH", "/a:/b").expect("first write");
        store.write("PATH", "/c").expect("second write");

        let contents = fs::read_to_string(store.path()).expect("read");
        assert_eq!(contents, "PATH=\"/c\"\n");
    }

    #[test]
    fn env_file_store_fails_when_directory_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = EnvFileStore::new(temp.path().join("missing").join("environment"));
        assert!(store.write("PATH", "/a").is_err());
    }

    #[test]
    fn memory_store_keeps_last_write() {
        let store = MemoryStore::new();
        store.write("Path", "a").expect("write");
        store.write("Path", "b").expect("write");
        assert_eq!(store.get("Path"), Some("b".to_string()));
    }
}
