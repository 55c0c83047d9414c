//! Test-only helpers for building commands and fake boundaries.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use crate::apply::Ports;
use crate::core::command::{Command, Mode};
use crate::io::config::ModpathConfig;
use crate::io::environment::MapEnvironment;
use crate::io::notify::RecordingNotifier;
use crate::io::store::MemoryStore;

/// Create a command with `mode` and `entries` and every flag off.
pub fn command(mode: Mode, entries: &[&str]) -> Command {
    Command {
        mode,
        entries: entries.iter().map(|entry| entry.to_string()).collect(),
        ..Command::default()
    }
}

/// Windows-style config (`Path`, `;`) regardless of the host platform.
pub fn windows_config() -> ModpathConfig {
    ModpathConfig {
        variable: "Path".to_string(),
        separator: ';',
        slash_flags: true,
        ..ModpathConfig::default()
    }
}

/// Fake environment, store, and notifier plus a scratch directory.
pub struct Harness {
    temp: TempDir,
    pub env: MapEnvironment,
    pub store: MemoryStore,
    pub notifier: RecordingNotifier,
}

impl Harness {
    /// Start with `variable` set to `value`.
    pub fn new(variable: &str, value: &str) -> Result<Self> {
        Ok(Self {
            temp: tempfile::tempdir()?,
            env: MapEnvironment::new().with(variable, value),
            store: MemoryStore::new(),
            notifier: RecordingNotifier::new(),
        })
    }

    /// Start with no variables set.
    pub fn empty() -> Result<Self> {
        Ok(Self {
            temp: tempfile::tempdir()?,
            env: MapEnvironment::new(),
            store: MemoryStore::new(),
            notifier: RecordingNotifier::new(),
        })
    }

    /// Swap in a notifier whose broadcasts fail with `message`.
    pub fn with_failing_notifier(mut self, message: &str) -> Self {
        self.notifier = RecordingNotifier::failing(message);
        self
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    pub fn ports(&self) -> Ports<'_, MapEnvironment, MemoryStore, RecordingNotifier> {
        Ports {
            env: &self.env,
            store: &self.store,
            notifier: &self.notifier,
        }
    }
}
