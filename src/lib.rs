#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # herald
//!
//! Declared events for plain Rust types, with shape-checked listeners and
//! generated event documentation.
//!
//! This library re-exports the workspace crates for convenience.

// Re-export all crates
pub use herald_docs as docs;
pub use herald_events as events;

pub use herald_events::{
    args, Arguments, Declarations, Dispatcher, Listener, Observer, Publisher, Signature, Value,
};

pub mod cli;
pub mod commands;
pub mod demo;
