//! Diagnostic tracing for modpath.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: which variable was read, how many segments
//!   it had, which store was written and whether the change broadcast went
//!   through. Selected with `RUST_LOG`, written to stderr.
//!
//! - **`-debug` output (`apply`)**: the before/after values on stdout,
//!   requested per invocation and unaffected by `RUST_LOG`. Scripts that
//!   capture stdout never see tracing events.

use std::env;
use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset, empty, or unparsable.
const DEFAULT_DIRECTIVES: &str = "warn";

/// Install the stderr subscriber.
///
/// A run lasts milliseconds, so timestamps are left out.
///
/// # Example
/// ```bash
/// RUST_LOG=modpath=debug modpath -registry -addend C:\tools
/// ```
pub fn init() {
    let filter = filter_from(env::var("RUST_LOG").ok().as_deref());

    // An already-installed global subscriber wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .compact(),
        )
        .try_init();
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
