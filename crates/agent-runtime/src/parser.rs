//! Parser for ReAct-style model output
//!
//! Accepted shapes:
//!
//! ```text
//! Thought: I should check the filings
//! Action: SECFilings
//! Action Input: IBM
//! ```
//!
//! ```text
//! Thought: I now know the final answer
//! Final Answer: IBM grew revenue 3%
//! ```

use regex::Regex;
use thiserror::Error;

/// What the model asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactStep {
    Action {
        thought: Option<String>,
        tool: String,
        input: String,
    },
    FinalAnswer {
        thought: Option<String>,
        answer: String,
    },
}

/// Model output that is neither a well-formed action nor a final answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<ParseError> for agent_core::Error {
    fn from(err: ParseError) -> Self {
        agent_core::Error::Parse(err.reason)
    }
}

const FINAL_ANSWER: &str = "Final Answer:";

/// Compiled ReAct grammar
#[derive(Debug, Clone)]
pub struct ReactParser {
    action: Regex,
    action_label: Regex,
    observation: Regex,
}

impl ReactParser {
    pub fn new() -> agent_core::Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| agent_core::Error::Configuration(e.to_string()))
        };
        Ok(Self {
            action: compile(
                r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)",
            )?,
            action_label: compile(r"(?m)^\s*Action\s*\d*\s*:")?,
            observation: compile(r"(?m)^\s*Observation\s*\d*\s*:")?,
        })
    }

    /// Parse one model reply
    pub fn parse(&self, output: &str) -> Result<ReactStep, ParseError> {
        // Models sometimes keep going and invent the tool result
        let text = match self.observation.find(output) {
            Some(m) => &output[..m.start()],
            None => output,
        };

        let final_at = text.find(FINAL_ANSWER);

        if let Some(caps) = self.action.captures(text) {
            if final_at.is_some() {
                return Err(ParseError::new(
                    "Output contains both an action and a final answer",
                ));
            }
            let tool = caps.get(1).map_or("", |m| m.as_str()).trim();
            let tool = tool.trim_matches(|c| c == '`' || c == '"' || c == '\'').trim();
            if tool.is_empty() {
                return Err(ParseError::new("Missing tool name after 'Action:'"));
            }
            let input = clean_input(caps.get(2).map_or("", |m| m.as_str()));
            let thought = caps.get(0).and_then(|m| thought_before(&text[..m.start()]));
            return Ok(ReactStep::Action {
                thought,
                tool: tool.to_string(),
                input,
            });
        }

        if let Some(at) = final_at {
            let answer = text[at + FINAL_ANSWER.len()..].trim();
            if answer.is_empty() {
                return Err(ParseError::new("'Final Answer:' is empty"));
            }
            return Ok(ReactStep::FinalAnswer {
                thought: thought_before(&text[..at]),
                answer: answer.to_string(),
            });
        }

        if self.action_label.is_match(text) {
            Err(ParseError::new("Missing 'Action Input:' after 'Action:'"))
        } else {
            Err(ParseError::new(
                "Missing 'Action:' after 'Thought:' and no 'Final Answer:' given",
            ))
        }
    }
}

fn thought_before(prefix: &str) -> Option<String> {
    let prefix = prefix.trim();
    let prefix = prefix.strip_prefix("Thought:").unwrap_or(prefix).trim();
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_string())
    }
}

/// Strip code fences and one layer of surrounding quotes
fn clean_input(raw: &str) -> String {
    let mut input = raw.trim();

    if let Some(rest) = input.strip_prefix("```") {
        // Drop an optional language tag on the opening fence line
        let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
        input = body.strip_suffix("```").unwrap_or(body).trim();
    }

    for quote in ['"', '\''] {
        if input.len() >= 2 && input.starts_with(quote) && input.ends_with(quote) {
            input = &input[1..input.len() - 1];
            break;
        }
    }

    input.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ReactParser {
        ReactParser::new().unwrap()
    }

    #[test]
    fn test_action() {
        let step = parser()
            .parse("Thought: I need the 10-K\nAction: SECFilings\nAction Input: IBM")
            .unwrap();
        assert_eq!(
            step,
            ReactStep::Action {
                thought: Some("I need the 10-K".to_string()),
                tool: "SECFilings".to_string(),
                input: "IBM".to_string(),
            }
        );
    }

    #[test]
    fn test_action_without_thought_label() {
        let step = parser()
            .parse("Let me check.\nAction: Echo\nAction Input: \"hi\"")
            .unwrap();
        assert_eq!(
            step,
            ReactStep::Action {
                thought: Some("Let me check.".to_string()),
                tool: "Echo".to_string(),
                input: "hi".to_string(),
            }
        );
    }

    #[test]
    fn test_final_answer() {
        let step = parser()
            .parse("Thought: I now know the final answer\nFinal Answer: done")
            .unwrap();
        assert_eq!(
            step,
            ReactStep::FinalAnswer {
                thought: Some("I now know the final answer".to_string()),
                answer: "done".to_string(),
            }
        );
    }

    #[test]
    fn test_bare_final_answer() {
        let step = parser().parse("Final Answer: done").unwrap();
        assert_eq!(
            step,
            ReactStep::FinalAnswer {
                thought: None,
                answer: "done".to_string(),
            }
        );
    }

    #[test]
    fn test_multiline_final_answer_kept() {
        let step = parser()
            .parse("Final Answer: Revenue up.\nMargins down.")
            .unwrap();
        assert!(matches!(step, ReactStep::FinalAnswer { ref answer, .. } if answer == "Revenue up.\nMargins down."));
    }

    #[test]
    fn test_hallucinated_observation_ignored() {
        let step = parser()
            .parse("Action: Echo\nAction Input: hi\nObservation: hi\nThought: done\nFinal Answer: hi")
            .unwrap();
        assert!(matches!(step, ReactStep::Action { ref tool, ref input, .. } if tool == "Echo" && input == "hi"));
    }

    #[test]
    fn test_both_action_and_answer_rejected() {
        let err = parser()
            .parse("Action: Echo\nAction Input: hi\nFinal Answer: hi")
            .unwrap_err();
        assert!(err.reason.contains("both"));
    }

    #[test]
    fn test_missing_action_input() {
        let err = parser().parse("Thought: hmm\nAction: Echo").unwrap_err();
        assert!(err.reason.contains("Action Input"));
    }

    #[test]
    fn test_unparseable() {
        let err = parser().parse("I think the market is fine.").unwrap_err();
        assert!(err.reason.contains("Missing 'Action:'"));

        assert!(parser().parse("").is_err());
        assert!(parser().parse("Final Answer:   ").is_err());
    }

    #[test]
    fn test_fenced_input() {
        assert_eq!(clean_input("```text\nApple Inc\n```"), "Apple Inc");
        assert_eq!(clean_input("'IBM'"), "IBM");
        assert_eq!(clean_input("\""), "\"");
    }

    #[test]
    fn test_parse_error_converts() {
        let err: agent_core::Error = ParseError::new("bad").into();
        assert!(matches!(err, agent_core::Error::Parse(ref r) if r == "bad"));
    }
}
