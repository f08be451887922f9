//! Tool trait definition

use agent_core::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// Trait for tools that agents can execute
///
/// Tools must not print or log as a way of reporting results: everything the
/// model should see goes into the returned text. A failure is returned as an
/// `Err`; the agent loop turns it into an observation so the model can adapt.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry. Matched exactly (case-sensitive).
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the LLM understand when to use this tool
    fn description(&self) -> &str;

    /// Invoke the tool with the raw action input
    async fn invoke(&self, input: &str) -> Result<String>;
}

type InvokeFn = dyn Fn(String) -> BoxFuture<'static, Result<String>> + Send + Sync;

/// A tool backed by an async closure
///
/// ```
/// use agent_tools::{FnTool, Tool};
///
/// # tokio_test::block_on(async {
/// let echo = FnTool::new("Echo", "Returns its input", |input| async move { Ok(input) });
/// assert_eq!(echo.invoke("hi").await.unwrap(), "hi");
/// # });
/// ```
pub struct FnTool {
    name: String,
    description: String,
    invoke: Box<InvokeFn>,
}

impl FnTool {
    /// Wrap `invoke` as a tool called `name`
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, invoke: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            invoke: Box::new(move |input| Box::pin(invoke(input))),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        (self.invoke)(input.to_string()).await
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
