//! Directive parsing: raw argument tokens -> [`Command`].
//!
//! The grammar is deliberately loose. Flags start with `-` (or `/` when
//! slash flags are enabled) and are matched case-insensitively; unknown
//! flags are ignored; every other token is a path entry. Mode flags
//! overwrite each other, so the last one wins.

use std::path::PathBuf;

use crate::core::expand::expand_vars;

/// How the entries of a [`Command`] are applied to the path list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Remove exact matches, then prepend the entries.
    #[default]
    AddFront,
    /// Remove exact matches, then append the entries.
    AddEnd,
    /// Remove exact matches only.
    Remove,
    /// Remove every segment containing an entry.
    RemoveAny,
}

impl Mode {
    /// Whether removal compares by substring instead of full value.
    pub fn is_inexact(self) -> bool {
        matches!(self, Mode::RemoveAny)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::AddFront => "add",
            Mode::AddEnd => "addend",
            Mode::Remove => "remove",
            Mode::RemoveAny => "removeany",
        }
    }
}

/// One invocation's worth of directives. Built once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub mode: Mode,
    /// Path entries in the order given, after variable expansion.
    pub entries: Vec<String>,
    /// Print the value before and after editing.
    pub debug: bool,
    /// Write the result to the durable store and broadcast the change.
    pub persist: bool,
    /// Where to write a script that re-sets the variable.
    pub script_path: Option<PathBuf>,
}

impl Command {
    /// No entries means there is nothing to do.
    pub fn is_noop(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept `/` as a flag marker in addition to `-`.
    ///
    /// On by default only on Windows, where absolute paths never start
    /// with `/`.
    pub slash_flags: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            slash_flags: cfg!(windows),
        }
    }
}

/// Parse raw argument tokens (program name excluded) into a [`Command`].
///
/// `lookup` resolves variable references in entries and in the script path.
pub fn parse_args<S, F>(args: &[S], options: ParseOptions, lookup: F) -> Command
where
    S: AsRef<str>,
    F: Fn(&str) -> Option<String>,
{
    let mut command = Command::default();
    let mut tokens = args.iter().map(|arg| arg.as_ref());

    while let Some(token) = tokens.next() {
        let Some(flag) = flag_name(token, options) else {
            command.entries.push(expand_vars(token, &lookup));
            continue;
        };
        match flag.to_lowercase().as_str() {
            "add" => command.mode = Mode::AddFront,
            "addend" => command.mode = Mode::AddEnd,
            "remove" => command.mode = Mode::Remove,
            "removeany" => command.mode = Mode::RemoveAny,
            "registry" | "persist" => command.persist = true,
            "debug" => command.debug = true,
            "makebat" => {
                if let Some(path) = tokens.next() {
                    command.script_path = Some(PathBuf::from(expand_vars(path, &lookup)));
                }
            }
            _ => {}
        }
    }

    command
}

fn flag_name(token: &str, options: ParseOptions) -> Option<&str> {
    token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('/').filter(|_| options.slash_flags))
}
