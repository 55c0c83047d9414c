//! Optional configuration read from the file named by `MODPATH_CONFIG`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::command::ParseOptions;
use crate::core::script::ScriptKind;
use crate::io::environment::EnvironmentPort;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "MODPATH_CONFIG";

/// modpath configuration (TOML).
///
/// Every field is optional; missing fields take the platform defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModpathConfig {
    /// Name of the path-list variable to edit.
    pub variable: String,

    /// Character separating segments of the variable.
    pub separator: char,

    /// Flavor of script written by `-makebat`.
    pub script: ScriptKind,

    /// Accept `/flag` as well as `-flag`.
    pub slash_flags: bool,

    /// File backing the durable store where there is no registry.
    pub store_file: PathBuf,

    /// Upper bound for each change broadcast, in milliseconds.
    pub broadcast_timeout_ms: u64,
}

impl Default for ModpathConfig {
    fn default() -> Self {
        let windows = cfg!(windows);
        Self {
            variable: if windows { "Path" } else { "PATH" }.to_string(),
            separator: if windows { ';' } else { ':' },
            script: ScriptKind::default(),
            slash_flags: ParseOptions::default().slash_flags,
            store_file: PathBuf::from("/etc/environment"),
            broadcast_timeout_ms: 5_000,
        }
    }
}

impl ModpathConfig {
    pub fn validate(&self) -> Result<()> {
        if self.variable.trim().is_empty() {
            return Err(anyhow!("variable must not be empty"));
        }
        if self.variable.contains(['=', '\0']) {
            return Err(anyhow!("variable must not contain '=' or NUL"));
        }
        if self.broadcast_timeout_ms == 0 {
            return Err(anyhow!("broadcast_timeout_ms must be > 0"));
        }
        if self.store_file.as_os_str().is_empty() {
            return Err(anyhow!("store_file must not be empty"));
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            slash_flags: self.slash_flags,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ModpathConfig::default()`.
pub fn load_config(path: &Path) -> Result<ModpathConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file missing, using defaults");
        let cfg = ModpathConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ModpathConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Load config from the file named by [`CONFIG_ENV_VAR`], if any.
pub fn load_config_from_env<E: EnvironmentPort + ?Sized>(env: &E) -> Result<ModpathConfig> {
    match env.var(CONFIG_ENV_VAR)? {
        Some(path) if !path.is_empty() => load_config(Path::new(&path)),
        _ => Ok(ModpathConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::environment::MapEnvironment;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ModpathConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("modpath.toml");
        fs::write(&path, "variable = \"PSModulePath\"\nscript = \"cmd\"\n").expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.variable, "PSModulePath");
        assert_eq!(cfg.script, ScriptKind::Cmd);
        assert_eq!(cfg.separator, ModpathConfig::default().separator);
        assert_eq!(cfg.broadcast_timeout_ms, 5_000);
    }

    #[test]
    fn rejects_multi_char_separator() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("modpath.toml");
        fs::write(&path, "separator = \";;\"\n").expect("write");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = ModpathConfig {
            broadcast_timeout_ms: 0,
            ..ModpathConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("broadcast_timeout_ms"));
    }

    #[test]
    fn rejects_variable_with_equals() {
        let cfg = ModpathConfig {
            variable: "A=B".to_string(),
            ..ModpathConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn env_var_selects_config_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("modpath.toml");
        fs::write(&path, "separator = \"|\"\n").expect("write");
        let env = MapEnvironment::new().with(CONFIG_ENV_VAR, &path.display().to_string());

        let cfg = load_config_from_env(&env).expect("load");
        assert_eq!(cfg.separator, '|');
    }

    #[test]
    fn unset_env_var_uses_defaults() {
        let cfg = load_config_from_env(&MapEnvironment::new()).expect("load");
        assert_eq!(cfg, ModpathConfig::default());
    }
}
