//! modpath: add, move, or remove entries of a path-list variable.
//!
//! Reads the variable from the current environment, edits it, prints it on
//! request, and optionally persists it machine-wide and/or writes a script
//! that re-sets it.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::{CommandFactory, Parser};
use modpath::apply::{ApplyError, Ports, apply};
use modpath::core::command::parse_args;
use modpath::exit_codes;
use modpath::io::config::load_config_from_env;
use modpath::io::environment::{ProcessEnvironment, lookup_var};
use modpath::io::notify::platform_notifier;
use modpath::io::store::platform_store;
use modpath::logging;

const DIRECTIVES_HELP: &str = "\
Options (case-insensitive, '-' marker; '/' as well on Windows):
  -add              Add entries to the front of the variable (default)
  -addend           Add entries to the end of the variable
  -remove           Remove entries that match exactly
  -removeany        Remove every segment containing an entry
  -makebat <file>   Write a script that re-sets the variable
  -registry         Persist to the machine environment and broadcast the change
  -debug            Print the value before and after editing

Entries may reference variables as %NAME%, $NAME or ${NAME}.
Set MODPATH_CONFIG to a TOML file to change the variable, separator or script flavor.";

#[derive(Parser)]
#[command(
    name = "modpath",
    about = "Modify a path-list environment variable",
    override_usage = "modpath [-option] [path1] .. [pathn]",
    after_help = DIRECTIVES_HELP,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Directives and path entries, in order.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<OsString>,
}

/// Argument vector for clap with an escape inserted after the program name.
///
/// Every user token, `--` included, is then a value of `ARGS`; directives
/// are interpreted by [`parse_args`], not by clap.
fn escaped_argv<I: IntoIterator<Item = OsString>>(raw: I) -> Vec<OsString> {
    let mut raw = raw.into_iter();
    let program = raw.next().unwrap_or_else(|| OsString::from("modpath"));
    [program, OsString::from("--")].into_iter().chain(raw).collect()
}

/// Tokens as UTF-8. Variable values are stored as strings, so an entry that
/// is not valid Unicode cannot be represented.
fn into_tokens(args: Vec<OsString>) -> anyhow::Result<Vec<String>> {
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|arg| {
                anyhow!("argument is not valid unicode: {}", arg.to_string_lossy())
            })
        })
        .collect()
}

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(()) => ExitCode::from(exit_codes::OK as u8),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:#}", anyhow::Error::from(err));
            ExitCode::from(code as u8)
        }
    }
}

fn run() -> Result<(), ApplyError> {
    let cli = Cli::try_parse_from(escaped_argv(env::args_os())).context("parse arguments")?;
    if cli.args.is_empty() {
        print_usage()?;
        return Ok(());
    }
    let tokens = into_tokens(cli.args)?;

    let env = ProcessEnvironment;
    let config = load_config_from_env(&env).context("load config")?;
    let command = parse_args(&tokens, config.parse_options(), |name| {
        lookup_var(&env, name)
    });

    let store = platform_store(&config);
    let notifier = platform_notifier(&config);
    let ports = Ports {
        env: &env,
        store: store.as_ref(),
        notifier: notifier.as_ref(),
    };
    let mut stdout = io::stdout().lock();
    apply(&command, &config, &ports, &mut stdout)?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}

fn print_usage() -> anyhow::Result<()> {
    Cli::command().print_help().context("print usage")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Vec<String> {
        let argv = std::iter::once("modpath")
            .chain(args.iter().copied())
            .map(OsString::from);
        let cli = Cli::try_parse_from(escaped_argv(argv)).expect("parse");
        into_tokens(cli.args).expect("tokens")
    }

    #[test]
    fn collects_directives_and_entries_verbatim() {
        assert_eq!(
            parse(&["-addend", "C:\\bin", "/debug", "-makebat", "x.bat"]),
            vec!["-addend", "C:\\bin", "/debug", "-makebat", "x.bat"]
        );
    }

    #[test]
    fn help_and_version_flags_are_passed_through() {
        assert_eq!(
            parse(&["-h", "--version", "x"]),
            vec!["-h", "--version", "x"]
        );
    }

    #[test]
    fn double_dash_is_an_ordinary_token() {
        assert_eq!(parse(&["--"]), vec!["--"]);
        assert_eq!(
            parse(&["-makebat", "--", "x"]),
            vec!["-makebat", "--", "x"]
        );
        assert_eq!(parse(&["x", "--", "--"]), vec!["x", "--", "--"]);
    }

    #[test]
    fn no_arguments_parse_to_empty() {
        assert!(parse(&[]).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_argument_is_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![OsString::from_vec(b"/opt/\xff/bin".to_vec())];
        let err = into_tokens(args).unwrap_err();
        assert!(err.to_string().contains("not valid unicode"));
    }

    #[test]
    fn usage_lists_every_directive() {
        let help = Cli::command().render_help().to_string();
        for flag in [
            "-add", "-addend", "-remove", "-removeany", "-makebat", "-registry", "-debug",
        ] {
            assert!(help.contains(flag), "usage is missing {flag}");
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
