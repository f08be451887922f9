//! Prompt templates for the news desk
//!
//! Every template can be replaced at runtime by a file in the prompt
//! override directory (see [`agent_prompt::FileLoader`]).

use agent_prompt::{FileLoader, JinjaTemplate, PromptRegistry, Result};
use std::path::Path;
use tracing::info;

/// Headline analysis. Variables: `headlines` (list of strings)
pub const ANALYZE_HEADLINES: &str = "news.analyze_headlines";

/// Research goal for one company. Variables: `company`
pub const RESEARCH_GOAL: &str = "news.research_goal";

/// Filing summary. Variables: `company`, `form_type`, `filing_date`, `filing`
pub const SEC_FILING_SUMMARY: &str = "news.sec_filing_summary";

// ============================================================================
// Headline analysis
// ============================================================================

/// Create the headline analysis template
pub fn analyze_headlines_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        ANALYZE_HEADLINES,
        "\
Analyze these financial headlines:
{% for headline in headlines %}- {{ headline }}
{% else %}(no headlines were available)
{% endfor %}
Identify key trends, provide key insights, and summarize the overall sentiment. \
Don't repeat the headlines. Be concise and clear. \
Categorize the headlines into sectors and give a brief summary for each sector, \
such as Technology (with sub categories such as fintech), Finance, Healthcare. \
Always provide a summary of the overall sentiment.",
    )
}

// ============================================================================
// Research
// ============================================================================

/// Create the research goal template
pub fn research_goal_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        RESEARCH_GOAL,
        "Assess {{ company }} for an investor. Use its latest SEC annual report to \
describe financial performance and red flags, then relate the findings to the \
current market sentiment.",
    )
}

/// Create the SEC filing summary template
pub fn sec_filing_summary_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        SEC_FILING_SUMMARY,
        r#"Analyze {{ company }} performance based on the following {{ form_type }} filing from {{ filing_date }}:
{{ filing }}

Provide valid JSON output with the following information:
- Relevant financial ratios and metrics commonly used in investment analysis.
- Potential red flags or areas of concern investors should be aware of.
- Relevant quantitative and qualitative data points with their time periods.
Return only a ```json fenced block, no other text.

Use this structure:
{
  "Company": {"Name": "string", "Ticker": "string"},
  "Financials": [{"Year": 0, "Revenue": "string (with unit)", "Net Income": "string (with unit)", "EPS": "string (with unit)", "ROE": "string (%)", "ROA": "string (%)"}],
  "Red Flags": [{"Year": 0, "Segment": "string", "Issue": "string (with metric)"}],
  "Qualitative Data": [{"Year": 0, "Description": "string"}]
}"#,
    )
}

/// Register all news desk prompts with the given registry
pub fn register_prompts(registry: &PromptRegistry) -> Result<()> {
    registry.register(analyze_headlines_prompt()?);
    registry.register(research_goal_prompt()?);
    registry.register(sec_filing_summary_prompt()?);
    Ok(())
}

/// Replace registered prompts with the templates found in `dir`
pub fn load_overrides(registry: &PromptRegistry, dir: &Path) -> Result<usize> {
    let count = FileLoader::new(dir).load_into(registry)?;
    info!(dir = %dir.display(), count, "Loaded prompt overrides");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> PromptRegistry {
        let registry = PromptRegistry::new();
        register_prompts(&registry).unwrap();
        registry
    }

    #[test]
    fn test_register_all_prompts() {
        let registry = registry();
        assert!(registry.contains(ANALYZE_HEADLINES));
        assert!(registry.contains(RESEARCH_GOAL));
        assert!(registry.contains(SEC_FILING_SUMMARY));
    }

    #[test]
    fn test_headlines_rendered_as_list() {
        let prompt = registry()
            .render(
                ANALYZE_HEADLINES,
                &json!({ "headlines": ["Stocks rally", "Oil slips"] }),
            )
            .unwrap();
        assert!(prompt.contains("- Stocks rally\n- Oil slips\n"));
        assert!(!prompt.contains("no headlines"));
    }

    #[test]
    fn test_empty_headlines() {
        let prompt = registry()
            .render(ANALYZE_HEADLINES, &json!({ "headlines": [] }))
            .unwrap();
        assert!(prompt.contains("(no headlines were available)"));
    }

    #[test]
    fn test_filing_summary_requires_filing() {
        let registry = registry();
        assert!(
            registry
                .render(SEC_FILING_SUMMARY, &json!({ "company": "IBM" }))
                .is_err()
        );

        let prompt = registry
            .render(
                SEC_FILING_SUMMARY,
                &json!({
                    "company": "IBM",
                    "form_type": "10-K",
                    "filing_date": "2025-02-25",
                    "filing": "Revenue grew."
                }),
            )
            .unwrap();
        assert!(prompt.starts_with("Analyze IBM performance based on the following 10-K filing from 2025-02-25:\nRevenue grew."));
    }

    #[test]
    fn test_research_goal() {
        let goal = registry()
            .render(RESEARCH_GOAL, &json!({ "company": "IBM" }))
            .unwrap();
        assert!(goal.starts_with("Assess IBM for an investor."));
    }
}
