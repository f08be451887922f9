//! Fluent text builder
//!
//! [`PromptBuilder`] assembles markdown-ish text piece by piece. It is used
//! for prompts that are easier to build in code than in a template, and for
//! the user-facing report.

/// Fluent builder for prompt and report text
///
/// # Examples
///
/// ```
/// use agent_prompt::PromptBuilder;
///
/// let text = PromptBuilder::new()
///     .text("Report for IBM")
///     .section("Headlines")
///     .numbered_list(["Stocks rally", "Oil slips"])
///     .build_trimmed();
///
/// assert_eq!(text, "Report for IBM\n## Headlines\n1. Stocks rally\n2. Oil slips");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
}

impl PromptBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw text
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.parts.push(content.into());
        self
    }

    /// Append a newline
    pub fn newline(self) -> Self {
        self.text("\n")
    }

    /// Append an empty line
    pub fn blank_line(self) -> Self {
        self.text("\n\n")
    }

    /// Append a `##` heading on its own line
    pub fn section(self, title: impl Into<String>) -> Self {
        self.text(format!("\n## {}\n", title.into()))
    }

    /// Append `content` only when `condition` holds
    pub fn when(self, condition: bool, content: impl Into<String>) -> Self {
        if condition { self.text(content) } else { self }
    }

    /// Append a `- item` line
    pub fn bullet(self, content: impl Into<String>) -> Self {
        self.text(format!("- {}\n", content.into()))
    }

    /// Append one `N. item` line per item, numbered from 1
    pub fn numbered_list<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (i, item) in items.into_iter().enumerate() {
            self = self.text(format!("{}. {}\n", i + 1, item.into()));
        }
        self
    }

    /// Append a `**key**: value` line
    pub fn field(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.text(format!("**{}**: {}\n", key.into(), value.into()))
    }

    /// Append a horizontal rule
    pub fn horizontal_rule(self) -> Self {
        self.text("\n---\n")
    }

    /// Concatenate all parts
    pub fn build(self) -> String {
        self.parts.concat()
    }

    /// Concatenate all parts and trim surrounding whitespace
    pub fn build_trimmed(self) -> String {
        self.build().trim().to_string()
    }

    /// Whether nothing was appended
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<PromptBuilder> for String {
    fn from(builder: PromptBuilder) -> Self {
        builder.build()
    }
}
