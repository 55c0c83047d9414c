//! Side-effecting boundaries: live environment, durable store, change
//! broadcast, script files, and configuration.
//!
//! Each boundary is a small trait (or a single function) so the
//! orchestration in [`crate::apply`] can be driven by fakes in tests.

pub mod config;
pub mod environment;
pub mod notify;
pub mod script;
pub mod store;
