//! Writing rendered scripts to disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::script::{ScriptKind, render_script};

/// Render and write a script assigning `value` to `variable`.
///
/// Any existing file at `path` is overwritten.
pub fn write_script(path: &Path, kind: ScriptKind, variable: &str, value: &str) -> Result<()> {
    let contents = render_script(kind, variable, value).context("render script")?;
    fs::write(path, contents).with_context(|| format!("write script {}", path.display()))?;
    info!(path = %path.display(), ?kind, "wrote script");
    Ok(())
}
