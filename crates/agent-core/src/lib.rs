//! Core abstractions for newsdesk
//!
//! This crate defines the fundamental traits and types shared by the rest of
//! the workspace: the [`Agent`] trait, the per-invocation [`Context`], and the
//! error taxonomy every other crate converts into.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::{CancellationFlag, Context};
pub use error::{Error, Result};
