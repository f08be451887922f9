//! `SECFilings` tool
//!
//! company or ticker -> newest 10-K text -> capable-model summary. When the
//! summary carries a fenced JSON block the tool returns that JSON
//! pretty-printed, otherwise the summary as written.

use crate::api::FilingProvider;
use crate::json::extract_fenced_json;
use crate::prompts::SEC_FILING_SUMMARY;
use agent_core::{Error, Result};
use agent_llm::LanguageModel;
use agent_prompt::PromptRegistry;
use agent_tools::Tool;
use agent_utils::preview;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub(crate) const NAME: &str = "SECFilings";

/// Summarizes a company's latest annual report
pub struct SecFilingsTool {
    filings: Arc<dyn FilingProvider>,
    model: Arc<dyn LanguageModel>,
    prompts: Arc<PromptRegistry>,
}

impl SecFilingsTool {
    /// `model` should be the capable tier: filings are long
    pub fn new(
        filings: Arc<dyn FilingProvider>,
        model: Arc<dyn LanguageModel>,
        prompts: Arc<PromptRegistry>,
    ) -> Self {
        Self {
            filings,
            model,
            prompts,
        }
    }
}

#[async_trait]
impl Tool for SecFilingsTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Summarize the latest SEC annual report (10-K) of a company. \
         Input: the company name or stock ticker, e.g. IBM."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        let company = input.trim();
        if company.is_empty() {
            return Err(Error::tool(NAME, "a company name or ticker is required"));
        }

        let filing = self
            .filings
            .latest_annual_report(company)
            .await
            .map_err(|e| Error::tool(NAME, e))?;

        let prompt = self
            .prompts
            .render(
                SEC_FILING_SUMMARY,
                &json!({
                    "company": filing.company,
                    "form_type": filing.form_type,
                    "filing_date": filing.filing_date,
                    "filing": filing.text,
                }),
            )
            .map_err(|e| Error::tool(NAME, e))?;

        let summary = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| Error::tool(NAME, e))?;
        debug!(summary_preview = %preview(&summary, 200), "Filing summarized");

        match extract_fenced_json(&summary) {
            Ok(value) => serde_json::to_string_pretty(&value).map_err(|e| Error::tool(NAME, e)),
            Err(_) => Ok(summary.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FilingDocument, MockFilingProvider};
    use crate::error::NewsError;
    use crate::prompts::register_prompts;
    use agent_llm::ScriptedModel;
    use mockall::predicate::eq;

    fn prompts() -> Arc<PromptRegistry> {
        let registry = PromptRegistry::new();
        register_prompts(&registry).unwrap();
        Arc::new(registry)
    }

    fn ibm_filing() -> FilingDocument {
        FilingDocument {
            company: "INTERNATIONAL BUSINESS MACHINES CORP".to_string(),
            ticker: "IBM".to_string(),
            form_type: "10-K".to_string(),
            filing_date: chrono::NaiveDate::from_ymd_opt(2025, 2, 25).unwrap(),
            url: "https://www.sec.gov/Archives/edgar/data/51143/x/ibm.htm".to_string(),
            text: "Revenue was $62.8 billion.".to_string(),
            truncated: false,
        }
    }

    fn provider_for(query: &'static str) -> MockFilingProvider {
        let mut provider = MockFilingProvider::new();
        provider
            .expect_latest_annual_report()
            .with(eq(query))
            .times(1)
            .returning(|_| Ok(ibm_filing()));
        provider
    }

    #[tokio::test]
    async fn test_fenced_json_is_pretty_printed() {
        let model = Arc::new(ScriptedModel::new([
            "Sure!\n```json\n{\"Company\": {\"Ticker\": \"IBM\"}}\n```",
        ]));
        let tool = SecFilingsTool::new(Arc::new(provider_for("IBM")), model.clone(), prompts());

        let out = tool.invoke(" IBM ").await.unwrap();
        assert_eq!(out, "{\n  \"Company\": {\n    \"Ticker\": \"IBM\"\n  }\n}");

        let sent = model.prompts();
        assert!(sent[0].contains("INTERNATIONAL BUSINESS MACHINES CORP"));
        assert!(sent[0].contains("Revenue was $62.8 billion."));
    }

    #[tokio::test]
    async fn test_plain_summary_returned_as_is() {
        let model = Arc::new(ScriptedModel::new(["  Revenue grew; debt is high.  "]));
        let tool = SecFilingsTool::new(Arc::new(provider_for("IBM")), model, prompts());

        assert_eq!(tool.invoke("IBM").await.unwrap(), "Revenue grew; debt is high.");
    }

    #[tokio::test]
    async fn test_unknown_company_is_tool_error() {
        let mut provider = MockFilingProvider::new();
        provider
            .expect_latest_annual_report()
            .returning(|q| Err(NewsError::CompanyNotFound(q.to_string())));
        let model = Arc::new(ScriptedModel::new(Vec::<String>::new()));
        let tool = SecFilingsTool::new(Arc::new(provider), model.clone(), prompts());

        let err = tool.invoke("Nope Corp").await.unwrap_err();
        assert!(err.to_string().contains("No company found for 'Nope Corp'"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let tool = SecFilingsTool::new(
            Arc::new(MockFilingProvider::new()),
            Arc::new(ScriptedModel::new(Vec::<String>::new())),
            prompts(),
        );
        assert!(tool.invoke("   ").await.is_err());
    }

    #[tokio::test]
    async fn test_model_failure_stays_inside_tool() {
        let tool = SecFilingsTool::new(
            Arc::new(provider_for("IBM")),
            Arc::new(ScriptedModel::unavailable()),
            prompts(),
        );
        let err = tool.invoke("IBM").await.unwrap_err();
        assert!(matches!(err, Error::ToolInvocation { .. }));
    }
}
