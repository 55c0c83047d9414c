//! Rendering of scripts that re-set a path-list variable.

use anyhow::Result;
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};

const CMD_TEMPLATE: &str = include_str!("scripts/setpath.cmd.j2");
const SH_TEMPLATE: &str = include_str!("scripts/setpath.sh.j2");

/// Interpreter the emitted script targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    /// Windows `cmd.exe` batch file.
    Cmd,
    /// POSIX `sh` script, meant to be sourced.
    Sh,
}

impl Default for ScriptKind {
    fn default() -> Self {
        if cfg!(windows) {
            ScriptKind::Cmd
        } else {
            ScriptKind::Sh
        }
    }
}

impl ScriptKind {
    fn template_name(self) -> &'static str {
        match self {
            ScriptKind::Cmd => "cmd",
            ScriptKind::Sh => "sh",
        }
    }
}

/// Template engine wrapper around minijinja.
struct ScriptEngine {
    env: Environment<'static>,
}

impl ScriptEngine {
    fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_filter("shell_quote", shell_quote);
        env.add_template("cmd", CMD_TEMPLATE)
            .expect("cmd template should be valid");
        env.add_template("sh", SH_TEMPLATE)
            .expect("sh template should be valid");
        Self { env }
    }

    fn render(&self, kind: ScriptKind, variable: &str, value: &str) -> Result<String> {
        let template = self.env.get_template(kind.template_name())?;
        let rendered = template.render(context! {
            variable => variable,
            value => value,
        })?;
        Ok(rendered)
    }
}

/// Render a script of `kind` that assigns `value` to `variable`.
pub fn render_script(kind: ScriptKind, variable: &str, value: &str) -> Result<String> {
    ScriptEngine::new().render(kind, variable, value)
}

/// Wrap `value` in single quotes for `sh`, escaping embedded quotes.
fn shell_quote(value: String) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_script_matches_batch_layout() {
        let script = render_script(ScriptKind::Cmd, "Path", "C:\\bin;C:\\Windows").expect("render");
        assert_eq!(script, "@echo off\nSet Path=C:\\bin;C:\\Windows\n\n");
    }

    #[test]
    fn cmd_script_is_not_html_escaped() {
        let script = render_script(ScriptKind::Cmd, "Path", "C:\\A&B\\<x>").expect("render");
        assert!(script.contains("Set Path=C:\\A&B\\<x>\n"));
    }

    #[test]
    fn sh_script_quotes_value() {
        let script = render_script(ScriptKind::Sh, "PATH", "/opt/it's:/usr/bin").expect("render");
        assert_eq!(
            script,
            "#!/bin/sh\nset +x\nexport PATH='/opt/it'\\''s:/usr/bin'\n"
        );
    }

    #[test]
    fn sh_script_turns_off_tracing_before_assignment() {
        let script = render_script(ScriptKind::Sh, "PATH", "/bin").expect("render");
        let lines: Vec<&str> = script.lines().collect();
        let quiet = lines.iter().position(|line| *line == "set +x").expect("set +x line");
        let assign = lines
            .iter()
            .position(|line| line.starts_with("export PATH="))
            .expect("export line");
        assert!(quiet < assign);
    }

    #[test]
    fn script_kind_parses_lowercase_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            script: ScriptKind,
        }
        let parsed: Wrapper = toml::from_str("script = \"sh\"").expect("parse");
        assert_eq!(parsed.script, ScriptKind::Sh);
    }
}
