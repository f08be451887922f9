//! Execution context for agents
//!
//! A `Context` belongs to exactly one agent invocation. It carries the run
//! identifier, an optional cooperative cancellation flag, and a typed
//! key-value store agents use to hand diagnostics (transcripts, outcomes)
//! back to their caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Well-known context keys
pub mod keys {
    /// Full transcript of the last research run
    pub const TRANSCRIPT: &str = "transcript";
    /// Outcome of the last research run
    pub const OUTCOME: &str = "outcome";
    /// Company or ticker the run is about
    pub const SUBJECT: &str = "subject";
}

/// Cooperative cancellation signal shared between a caller and a run
///
/// Cloning yields a handle to the same flag. Cancelling is idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    /// Create a flag in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::{CancellationFlag, Context};
///
/// let flag = CancellationFlag::new();
/// let ctx = Context::new().with_cancellation(flag.clone());
///
/// assert!(!ctx.is_cancelled());
/// flag.cancel();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    run_id: Uuid,
    cancellation: Option<CancellationFlag>,
    data: HashMap<String, serde_json::Value>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            cancellation: None,
            data: HashMap::new(),
        }
    }
}

impl Context {
    /// Create a new empty context with a fresh run id
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a cancellation flag
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Record the subject (company or ticker) of this invocation
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.insert(keys::SUBJECT, serde_json::json!(subject.into()));
        self
    }

    /// Identifier of the invocation owning this context
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Whether the caller asked this invocation to stop
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationFlag::is_cancelled)
    }

    /// Get the subject, if one was recorded
    pub fn subject(&self) -> Option<&str> {
        self.get(keys::SUBJECT).and_then(|v| v.as_str())
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    ///
    /// Serializes the value to JSON before storing.
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }
}
