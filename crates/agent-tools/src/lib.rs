//! Tool management for newsdesk agents
//!
//! A tool is a named capability with a natural-language description that a
//! research agent may invoke mid-reasoning. Tools take and return plain text.

pub mod registry;
pub mod tool;

pub use registry::{ToolDescriptor, ToolRegistry};
pub use tool::{FnTool, Tool};
