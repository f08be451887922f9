//! JSON embedded in model replies

use crate::error::{NewsError, Result};
use regex::Regex;
use serde_json::Value;

const FENCED_JSON: &str = r"(?s)```json[ \t]*\r?\n(.*?)\r?\n?```";

/// Parse the first ```` ```json ```` fenced block in `text`
///
/// Fails with [`NewsError::NoJson`] when there is no such block and with
/// [`NewsError::Json`] when the block is not valid JSON.
pub fn extract_fenced_json(text: &str) -> Result<Value> {
    let re = Regex::new(FENCED_JSON)
        .map_err(|e| NewsError::Config(format!("invalid JSON fence pattern: {e}")))?;
    let captures = re.captures(text).ok_or(NewsError::NoJson)?;
    let body = captures.get(1).map_or("", |m| m.as_str()).trim();
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_first_block() {
        let text = "Here is the analysis:\n```json\n{\"Company\": {\"Ticker\": \"IBM\"}}\n```\nand more\n```json\n{}\n```";
        let value = extract_fenced_json(text).unwrap();
        assert_eq!(value, json!({"Company": {"Ticker": "IBM"}}));
    }

    #[test]
    fn test_multiline_block() {
        let text = "```json\n{\n  \"Red Flags\": [\n    {\"Year\": 2024}\n  ]\n}\n```";
        let value = extract_fenced_json(text).unwrap();
        assert_eq!(value["Red Flags"][0]["Year"], 2024);
    }

    #[test]
    fn test_no_block() {
        assert!(matches!(
            extract_fenced_json("{\"bare\": true}"),
            Err(NewsError::NoJson)
        ));
    }

    #[test]
    fn test_invalid_json_in_block() {
        assert!(matches!(
            extract_fenced_json("```json\n{not json}\n```"),
            Err(NewsError::Json(_))
        ));
    }
}
