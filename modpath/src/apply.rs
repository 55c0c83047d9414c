//! Orchestration for a single `modpath` invocation.
//!
//! Load -> transform -> persist (optional) -> script (optional). Every step
//! either completes or aborts the run; there is no retry and no rollback. A
//! failed change broadcast after a successful store write is reported but
//! does not fail the run, since the store already holds the new value.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info, instrument};

use crate::core::command::Command;
use crate::core::transform::apply_command;
use crate::exit_codes;
use crate::io::config::ModpathConfig;
use crate::io::environment::{EnvironmentPort, load_path_list};
use crate::io::notify::{ChangeNotifier, ENVIRONMENT_CATEGORY};
use crate::io::script::write_script;
use crate::io::store::DurableStore;

/// Failure of a run, classified by the boundary that failed.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// The durable store rejected the write.
    #[error("persist {variable}")]
    Store {
        variable: String,
        #[source]
        source: anyhow::Error,
    },
    /// The script file could not be written.
    #[error("emit script {}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    /// Anything else: unreadable environment, bad config, closed stdout.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApplyError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApplyError::Store { .. } => exit_codes::STORE_FAILURE,
            ApplyError::Script { .. } => exit_codes::SCRIPT_FAILURE,
            ApplyError::Other(_) => exit_codes::INVALID,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// No entries were given; nothing was read or written.
    NoOp,
    Applied(AppliedChange),
}

/// Details of a completed edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    /// Variable value before editing.
    pub before: String,
    /// Variable value after editing.
    pub after: String,
    /// Whether the new value was written to the durable store.
    pub persisted: bool,
    /// Whether the change broadcast succeeded. `false` when not persisted.
    pub notified: bool,
    /// Script written, if one was requested.
    pub script: Option<PathBuf>,
}

/// Boundaries a run talks to.
pub struct Ports<'a, E: ?Sized, S: ?Sized, N: ?Sized> {
    pub env: &'a E,
    pub store: &'a S,
    pub notifier: &'a N,
}

/// Run `command` against the environment described by `ports`.
///
/// Debug output (`-debug`) is written to `out`.
#[instrument(skip_all, fields(mode = command.mode.as_str(), entries = command.entries.len()))]
pub fn apply<E, S, N, W>(
    command: &Command,
    config: &ModpathConfig,
    ports: &Ports<'_, E, S, N>,
    out: &mut W,
) -> Result<ApplyOutcome, ApplyError>
where
    E: EnvironmentPort + ?Sized,
    S: DurableStore + ?Sized,
    N: ChangeNotifier + ?Sized,
    W: Write,
{
    if command.is_noop() {
        debug!("no entries given, nothing to do");
        return Ok(ApplyOutcome::NoOp);
    }

    let variable = config.variable.as_str();
    let list = load_path_list(ports.env, variable, config.separator)
        .with_context(|| format!("read {variable}"))?;
    let before = list.join(config.separator);
    if command.debug {
        writeln!(out, "Original {variable}: '{before}'\n").context("write debug output")?;
    }

    let updated = apply_command(list, command);
    let after = updated.join(config.separator);
    debug!(
        before = before.len(),
        after = after.len(),
        segments = updated.len(),
        "transformed path list"
    );
    if command.debug {
        writeln!(out, "New {variable}: '{after}'\n").context("write debug output")?;
    }

    let mut notified = false;
    if command.persist {
        ports
            .store
            .write(variable, &after)
            .map_err(|source| ApplyError::Store {
                variable: variable.to_string(),
                source,
            })?;
        info!(variable, "persisted new value");
        notified = broadcast_change(ports.notifier, command.debug, out)?;
    }

    if let Some(path) = &command.script_path {
        write_script(path, config.script, variable, &after).map_err(|source| {
            ApplyError::Script {
                path: path.clone(),
                source,
            }
        })?;
    }

    Ok(ApplyOutcome::Applied(AppliedChange {
        before,
        after,
        persisted: command.persist,
        notified,
        script: command.script_path.clone(),
    }))
}

/// Announce the environment change. Failure is reported, never propagated.
fn broadcast_change<N, W>(notifier: &N, report: bool, out: &mut W) -> Result<bool, ApplyError>
where
    N: ChangeNotifier + ?Sized,
    W: Write,
{
    match notifier.notify(ENVIRONMENT_CATEGORY) {
        Ok(()) => Ok(true),
        Err(err) => {
            debug!(err = %format!("{err:#}"), "change broadcast failed");
            if report {
                writeln!(out, "Broadcast of {ENVIRONMENT_CATEGORY} change failed: {err:#}\n")
                    .context("write debug output")?;
            }
            Ok(false)
        }
    }
}
