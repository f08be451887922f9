//! Built-in prompt templates for the research loop

use agent_prompt::{JinjaTemplate, PromptRegistry, Result};

/// Id of the ReAct prompt rendered on every Thinking step
///
/// Variables: `goal`, `tools` (list of `{name, description}`), `tool_names`
/// (comma separated), `scratchpad` (the transcript so far in ReAct form).
pub const REACT_TEMPLATE: &str = "research.react";

const REACT_SOURCE: &str = "\
Answer the following question as best you can. You have access to the following tools:

{% for tool in tools %}{{ tool.name }}: {{ tool.description }}
{% endfor %}
Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{{ tool_names }}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {{ goal }}
{{ scratchpad }}Thought:";

/// Register the runtime's default templates
pub fn register_default_prompts(registry: &PromptRegistry) -> Result<()> {
    registry.register(JinjaTemplate::new(REACT_TEMPLATE, REACT_SOURCE)?);
    Ok(())
}
