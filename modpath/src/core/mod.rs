//! Deterministic, pure logic for editing path-list variables.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values (raw argument tokens, loaded segments) and return deterministic
//! outputs suitable for tests. Anything that touches the live environment,
//! the durable store, or the filesystem lives in [`crate::io`].

pub mod command;
pub mod expand;
pub mod path_list;
pub mod script;
pub mod transform;
