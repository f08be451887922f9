//! The news desk pipeline
//!
//! ```text
//! sources -> headlines -> fast-model analysis -> research per company -> reports
//! ```
//!
//! Research runs for different companies are independent: they share only
//! the read-only tool registry, so they execute concurrently.

use crate::api::{FearGreedClient, FilingProvider, SecEdgarClient, SentimentProvider};
use crate::config::NewsConfig;
use crate::headline::Headline;
use crate::prompts::{ANALYZE_HEADLINES, RESEARCH_GOAL, load_overrides, register_prompts};
use crate::report::{Report, assemble_report};
use crate::sources::{HeadlineSource, SourceFailure, collect_headlines, sources_from_config};
use crate::tools::news_tool_registry;
use agent_core::{CancellationFlag, Context, Error, Result};
use agent_llm::{ModelSet, ModelTier};
use agent_prompt::PromptRegistry;
use agent_runtime::{
    AgentRuntime, AnalystAgent, ExecutorEventHandler, ResearchAgent, RunReport,
    TracingEventHandler,
};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Research of one company
#[derive(Debug, Clone)]
pub struct CompanyResearch {
    pub subject: String,
    pub report: RunReport,
}

/// Everything one pipeline run produced
#[derive(Debug, Clone)]
pub struct NewsBrief {
    pub headlines: Vec<Headline>,
    pub source_failures: Vec<SourceFailure>,
    pub analysis: String,
    /// Full research runs, for transcript inspection
    pub research: Vec<CompanyResearch>,
    /// One report per company, or a single report when no research ran
    pub reports: Vec<Report>,
}

/// Runs the pipeline against fixed sources, models and tools
pub struct NewsDesk {
    sources: Vec<Arc<dyn HeadlineSource>>,
    prompts: Arc<PromptRegistry>,
    analyst: AnalystAgent,
    researcher: ResearchAgent,
}

impl NewsDesk {
    /// Create a new builder
    pub fn builder() -> NewsDeskBuilder {
        NewsDeskBuilder::new()
    }

    /// Wire up the live sources and data providers named in `config`
    pub fn from_config(config: &NewsConfig, models: ModelSet) -> Result<Self> {
        config.validate()?;

        let prompts = PromptRegistry::new();
        register_prompts(&prompts)?;
        if let Some(dir) = &config.prompts_dir {
            load_overrides(&prompts, dir)?;
        }

        Self::builder()
            .sources(sources_from_config(config)?)
            .filings(Arc::new(SecEdgarClient::from_config(config)?))
            .sentiment(Arc::new(FearGreedClient::from_config(config)?))
            .models(models)
            .prompts(Arc::new(prompts))
            .max_iterations(config.max_iterations)
            .build()
    }

    /// Run the pipeline; `companies` may be empty to skip research
    pub async fn run(&self, companies: &[String]) -> Result<NewsBrief> {
        self.run_with_cancellation(companies, CancellationFlag::new())
            .await
    }

    /// Run the pipeline; cancelling `flag` stops research between steps
    #[instrument(skip(self, flag), fields(companies = companies.len()))]
    pub async fn run_with_cancellation(
        &self,
        companies: &[String],
        flag: CancellationFlag,
    ) -> Result<NewsBrief> {
        let batch = collect_headlines(&self.sources).await;
        if batch.is_empty() {
            warn!(
                failed_sources = batch.failures.len(),
                "No headlines available; continuing with an empty list"
            );
        }

        let analysis = self.analyze(&batch.headlines).await?;

        let runs = join_all(
            companies
                .iter()
                .map(|company| self.research(company, flag.clone())),
        )
        .await;
        let research = runs.into_iter().collect::<Result<Vec<_>>>()?;

        let reports = if research.is_empty() {
            vec![assemble_report(&batch.headlines, &analysis, None)]
        } else {
            research
                .iter()
                .map(|r| {
                    assemble_report(
                        &batch.headlines,
                        &analysis,
                        Some((r.subject.as_str(), &r.report.outcome)),
                    )
                })
                .collect()
        };

        info!(
            headlines = batch.headlines.len(),
            reports = reports.len(),
            "News brief ready"
        );

        Ok(NewsBrief {
            headlines: batch.headlines,
            source_failures: batch.failures,
            analysis,
            research,
            reports,
        })
    }

    /// Fast-model analysis of the headlines
    ///
    /// A model failure degrades to a note in the analysis instead of ending
    /// the pipeline; template errors still fail.
    async fn analyze(&self, headlines: &[Headline]) -> Result<String> {
        let texts: Vec<&str> = headlines.iter().map(Headline::as_str).collect();
        match self.analyst.analyze(&json!({ "headlines": texts })).await {
            Ok(analysis) => Ok(analysis),
            Err(Error::ModelUnavailable(detail)) => {
                warn!(%detail, "Headline analysis failed");
                Ok(format!("Analysis unavailable: {detail}"))
            }
            Err(e) => Err(e),
        }
    }

    async fn research(&self, company: &str, flag: CancellationFlag) -> Result<CompanyResearch> {
        let goal = self
            .prompts
            .render(RESEARCH_GOAL, &json!({ "company": company }))?;
        let mut context = Context::new()
            .with_subject(company)
            .with_cancellation(flag);

        let report = self.researcher.research(&goal, &mut context).await?;
        info!(
            company,
            completed = report.outcome.is_completed(),
            iterations = report.run.iteration_count(),
            "Research finished"
        );

        Ok(CompanyResearch {
            subject: company.to_string(),
            report,
        })
    }
}

/// Builder for NewsDesk
pub struct NewsDeskBuilder {
    sources: Vec<Arc<dyn HeadlineSource>>,
    filings: Option<Arc<dyn FilingProvider>>,
    sentiment: Option<Arc<dyn SentimentProvider>>,
    models: Option<ModelSet>,
    prompts: Option<Arc<PromptRegistry>>,
    max_iterations: usize,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl NewsDeskBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            filings: None,
            sentiment: None,
            models: None,
            prompts: None,
            max_iterations: NewsConfig::default().max_iterations,
            event_handler: Arc::new(TracingEventHandler),
        }
    }

    /// Set the headline sources
    pub fn sources(mut self, sources: Vec<Arc<dyn HeadlineSource>>) -> Self {
        self.sources = sources;
        self
    }

    /// Set the filing provider behind `SECFilings`
    pub fn filings(mut self, filings: Arc<dyn FilingProvider>) -> Self {
        self.filings = Some(filings);
        self
    }

    /// Set the sentiment provider behind `MarketSentiment`
    pub fn sentiment(mut self, sentiment: Arc<dyn SentimentProvider>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Set the fast and capable models
    pub fn models(mut self, models: ModelSet) -> Self {
        self.models = Some(models);
        self
    }

    /// Set the prompt registry (defaults to the built-in news prompts)
    pub fn prompts(mut self, prompts: Arc<PromptRegistry>) -> Self {
        self.prompts = Some(prompts);
        self
    }

    /// Set the research iteration budget
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the trace sink for research runs
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    /// Build the news desk
    pub fn build(self) -> Result<NewsDesk> {
        let models = self
            .models
            .ok_or_else(|| Error::InitializationFailed("Models not set".to_string()))?;
        let filings = self
            .filings
            .ok_or_else(|| Error::InitializationFailed("Filing provider not set".to_string()))?;
        let sentiment = self.sentiment.ok_or_else(|| {
            Error::InitializationFailed("Sentiment provider not set".to_string())
        })?;

        let prompts = match self.prompts {
            Some(prompts) => prompts,
            None => {
                let prompts = PromptRegistry::new();
                register_prompts(&prompts)?;
                Arc::new(prompts)
            }
        };

        let tools = news_tool_registry(
            filings,
            sentiment,
            models.get(ModelTier::Capable),
            prompts.clone(),
        )?;

        let runtime = AgentRuntime::builder()
            .models(models)
            .tool_registry(Arc::new(tools))
            .prompts(prompts.clone())
            .default_max_iterations(self.max_iterations)
            .event_handler(self.event_handler)
            .build()?;

        let analyst =
            runtime.create_analyst_agent(ANALYZE_HEADLINES, ModelTier::Fast, "headline-analyst")?;
        let researcher = runtime.create_default_research_agent("researcher")?;

        Ok(NewsDesk {
            sources: self.sources,
            prompts,
            analyst,
            researcher,
        })
    }
}

impl Default for NewsDeskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        FilingDocument, MockFilingProvider, MockSentimentProvider, SentimentReading,
    };
    use crate::error::NewsError;
    use crate::sources::MockHeadlineSource;
    use agent_llm::ScriptedModel;
    use agent_runtime::{AbortReason, RunOutcome, TranscriptEntry};

    fn source(texts: &'static [&'static str]) -> Arc<dyn HeadlineSource> {
        let mut mock = MockHeadlineSource::new();
        mock.expect_id().return_const("mock".to_string());
        mock.expect_fetch()
            .returning(move || Ok(texts.iter().filter_map(Headline::new).collect()));
        Arc::new(mock)
    }

    fn failing_source() -> Arc<dyn HeadlineSource> {
        let mut mock = MockHeadlineSource::new();
        mock.expect_id().return_const("yahoo".to_string());
        mock.expect_fetch()
            .returning(|| Err(NewsError::fetch("yahoo", "no headlines found")));
        Arc::new(mock)
    }

    fn filings() -> Arc<dyn FilingProvider> {
        let mut mock = MockFilingProvider::new();
        mock.expect_latest_annual_report().returning(|q| {
            Ok(FilingDocument {
                company: q.to_uppercase(),
                ticker: q.to_uppercase(),
                form_type: "10-K".to_string(),
                filing_date: chrono::NaiveDate::from_ymd_opt(2025, 2, 25).unwrap(),
                url: "https://www.sec.gov/".to_string(),
                text: "Revenue grew.".to_string(),
                truncated: false,
            })
        });
        Arc::new(mock)
    }

    fn sentiment() -> Arc<dyn SentimentProvider> {
        let mut mock = MockSentimentProvider::new();
        mock.expect_current().returning(|| {
            Ok(SentimentReading {
                score: 55.0,
                rating: "neutral".to_string(),
            })
        });
        Arc::new(mock)
    }

    fn desk(
        sources: Vec<Arc<dyn HeadlineSource>>,
        fast: Arc<ScriptedModel>,
        capable: Arc<ScriptedModel>,
        max_iterations: usize,
    ) -> NewsDesk {
        NewsDesk::builder()
            .sources(sources)
            .filings(filings())
            .sentiment(sentiment())
            .models(ModelSet::new(fast, capable))
            .max_iterations(max_iterations)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_without_research_single_report() {
        let fast = Arc::new(ScriptedModel::new(["Tech leads; sentiment positive."]));
        let capable = Arc::new(ScriptedModel::new(Vec::<String>::new()));
        let desk = desk(
            vec![source(&["Stocks rally", "Oil slips"])],
            fast.clone(),
            capable.clone(),
            5,
        );

        let brief = desk.run(&[]).await.unwrap();

        assert_eq!(brief.headlines.len(), 2);
        assert_eq!(brief.analysis, "Tech leads; sentiment positive.");
        assert_eq!(brief.reports.len(), 1);
        assert!(brief.reports[0].research.is_none());
        assert!(fast.prompts()[0].contains("- Stocks rally\n- Oil slips"));
        assert_eq!(capable.calls(), 0);
    }

    #[tokio::test]
    async fn test_research_uses_tools_and_completes() {
        let fast = Arc::new(ScriptedModel::new(["Neutral."]));
        let capable = Arc::new(ScriptedModel::new([
            "Thought: check the mood\nAction: MarketSentiment\nAction Input: none",
            "Thought: enough\nFinal Answer: IBM is steady; market is neutral.",
        ]));
        let desk = desk(vec![source(&["IBM beats"])], fast, capable.clone(), 5);

        let brief = desk.run(&["IBM".to_string()]).await.unwrap();

        assert_eq!(brief.research.len(), 1);
        let run = &brief.research[0].report;
        assert_eq!(
            run.outcome,
            RunOutcome::Completed {
                answer: "IBM is steady; market is neutral.".to_string()
            }
        );
        assert!(run.run.transcript().iter().any(|e| matches!(
            e,
            TranscriptEntry::Observation { text, .. } if text == "Market sentiment: neutral (score 55/100)"
        )));
        assert!(capable.prompts()[0].contains("Assess IBM for an investor."));

        let report = brief.reports[0].to_string();
        assert!(report.contains("## Research: IBM\nFinal answer\nIBM is steady"));
    }

    #[tokio::test]
    async fn test_failed_source_degrades() {
        let fast = Arc::new(ScriptedModel::new(["Nothing to analyze."]));
        let capable = Arc::new(ScriptedModel::new(Vec::<String>::new()));
        let desk = desk(vec![failing_source()], fast.clone(), capable, 5);

        let brief = desk.run(&[]).await.unwrap();

        assert!(brief.headlines.is_empty());
        assert_eq!(brief.source_failures.len(), 1);
        assert_eq!(brief.source_failures[0].source_id, "yahoo");
        assert!(fast.prompts()[0].contains("(no headlines were available)"));
    }

    #[tokio::test]
    async fn test_analysis_model_failure_degrades() {
        let desk = desk(
            vec![source(&["Stocks rally"])],
            Arc::new(ScriptedModel::unavailable()),
            Arc::new(ScriptedModel::new(Vec::<String>::new())),
            5,
        );

        let brief = desk.run(&[]).await.unwrap();
        assert!(brief.analysis.starts_with("Analysis unavailable:"));
    }

    #[tokio::test]
    async fn test_each_company_gets_its_own_report() {
        let fast = Arc::new(ScriptedModel::new(["Mixed."]));
        let capable = Arc::new(ScriptedModel::repeating("Final Answer: looks fine"));
        let desk = desk(vec![source(&["Stocks rally"])], fast, capable.clone(), 5);

        let companies = vec!["IBM".to_string(), "AAPL".to_string()];
        let brief = desk.run(&companies).await.unwrap();

        let subjects: Vec<&str> = brief.research.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["IBM", "AAPL"]);
        assert_eq!(brief.reports.len(), 2);
        assert!(brief.reports.iter().all(Report::has_final_answer));
        assert_ne!(
            brief.research[0].report.run.id(),
            brief.research[1].report.run.id()
        );
        assert_eq!(capable.calls(), 2);
    }

    #[tokio::test]
    async fn test_budget_exhaustion_reported_as_aborted() {
        let fast = Arc::new(ScriptedModel::new(["Mixed."]));
        let capable = Arc::new(ScriptedModel::repeating("I am not sure what to do."));
        let desk = desk(vec![source(&["Stocks rally"])], fast, capable.clone(), 2);

        let brief = desk.run(&["IBM".to_string()]).await.unwrap();

        assert!(matches!(
            brief.research[0].report.outcome,
            RunOutcome::Aborted {
                reason: AbortReason::IterationBudgetExhausted { max: 2 },
                ..
            }
        ));
        assert_eq!(capable.calls(), 2);
        assert!(brief.reports[0]
            .to_string()
            .contains("Aborted: iteration budget exhausted"));
    }

    #[tokio::test]
    async fn test_cancelled_before_research() {
        let fast = Arc::new(ScriptedModel::new(["Mixed."]));
        let capable = Arc::new(ScriptedModel::repeating("Final Answer: x"));
        let desk = desk(vec![source(&["Stocks rally"])], fast, capable.clone(), 5);

        let flag = CancellationFlag::new();
        flag.cancel();
        let brief = desk
            .run_with_cancellation(&["IBM".to_string()], flag)
            .await
            .unwrap();

        assert!(matches!(
            brief.research[0].report.outcome,
            RunOutcome::Aborted {
                reason: AbortReason::Cancelled,
                ..
            }
        ));
        assert_eq!(capable.calls(), 0);
    }

    #[test]
    fn test_build_requires_providers() {
        let result = NewsDesk::builder()
            .models(ModelSet::uniform(Arc::new(ScriptedModel::repeating("x"))))
            .build();
        assert!(matches!(result, Err(Error::InitializationFailed(_))));
    }
}
