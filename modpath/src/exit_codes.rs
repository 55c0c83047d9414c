//! Stable exit codes for the modpath CLI.

/// Edit applied, nothing to do, or usage shown.
pub const OK: i32 = 0;
/// Invalid configuration, unreadable environment, or other errors.
pub const INVALID: i32 = 1;
/// The durable store could not be written.
pub const STORE_FAILURE: i32 = 2;
/// The `-makebat` script could not be written.
pub const SCRIPT_FAILURE: i32 = 3;
