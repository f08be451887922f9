//! Shared utilities for newsdesk
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup, log configuration, and small text helpers.

pub mod config;
pub mod logging;
pub mod text;

pub use config::{LogConfig, LogFormat};
pub use logging::{init_tracing, init_tracing_default};
pub use text::preview;
