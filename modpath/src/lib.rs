//! Edit path-list environment variables (`PATH` and friends).
//!
//! An invocation is a list of directives and path entries. The entries are
//! removed from the current value (exactly, or by substring for
//! `-removeany`), then prepended or appended for the add modes. The result
//! can be persisted to the machine-wide environment and/or written out as a
//! script that re-sets the variable.
//!
//! - **[`core`]**: Pure, deterministic logic (parsing, expansion, list editing,
//!   script rendering). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting boundaries (environment, durable store,
//!   broadcast, files, config). Behind traits so tests can use fakes.
//!
//! [`apply`] sequences the two for the CLI.

pub mod apply;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
