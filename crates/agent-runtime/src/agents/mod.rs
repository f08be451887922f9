//! Concrete agent implementations
//!
//! - ResearchAgent: ReAct loop with tool execution
//! - AnalystAgent: single prompt, single model call

pub mod analyst;
pub mod research;

pub use analyst::AnalystAgent;
pub use research::ResearchAgent;
