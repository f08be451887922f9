//! Report assembly
//!
//! [`assemble_report`] is pure: it copies its inputs into a [`Report`] whose
//! `Display` output is the same every time it is rendered.

use crate::headline::Headline;
use agent_prompt::PromptBuilder;
use agent_runtime::{AbortReason, RunOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Research result for one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSection {
    /// Company or ticker the research was about
    pub subject: String,
    pub outcome: RunOutcome,
}

/// A display-ready news report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub headlines: Vec<Headline>,
    pub analysis: String,
    pub research: Option<ResearchSection>,
}

/// Combine headlines, the headline analysis and an optional research outcome
pub fn assemble_report(
    headlines: &[Headline],
    analysis: &str,
    research: Option<(&str, &RunOutcome)>,
) -> Report {
    Report {
        headlines: headlines.to_vec(),
        analysis: analysis.trim().to_string(),
        research: research.map(|(subject, outcome)| ResearchSection {
            subject: subject.to_string(),
            outcome: outcome.clone(),
        }),
    }
}

/// Heading line that tells a final answer apart from an aborted run
pub fn outcome_label(outcome: &RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Completed { .. } => "Final answer",
        RunOutcome::Aborted { reason, .. } => match reason {
            AbortReason::IterationBudgetExhausted { .. } => "Aborted: iteration budget exhausted",
            AbortReason::ModelUnavailable { .. } => "Aborted: model unavailable",
            AbortReason::Cancelled => "Aborted: cancelled",
        },
    }
}

impl Report {
    /// Whether the report carries a completed research answer
    pub fn has_final_answer(&self) -> bool {
        self.research
            .as_ref()
            .is_some_and(|r| r.outcome.is_completed())
    }

    fn render(&self) -> String {
        let mut builder = PromptBuilder::new().section("Headlines");
        if self.headlines.is_empty() {
            builder = builder.text("(no headlines were available)\n");
        }
        for headline in &self.headlines {
            builder = builder.bullet(headline.as_str());
        }

        builder = builder.section("Analysis").text(self.analysis.as_str()).newline();

        if let Some(research) = &self.research {
            builder = builder
                .section(format!("Research: {}", research.subject))
                .text(format!("{}\n", outcome_label(&research.outcome)));

            builder = match &research.outcome {
                RunOutcome::Completed { answer } => builder.text(answer.as_str()).newline(),
                RunOutcome::Aborted { reason, partial } => {
                    let builder = builder.field("Reason", reason.to_string());
                    match partial {
                        Some(partial) => builder
                            .text("Partial result:\n")
                            .text(partial.as_str())
                            .newline(),
                        None => builder.text("No partial result.\n"),
                    }
                }
            };
        }

        builder.build_trimmed()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headlines() -> Vec<Headline> {
        ["Stocks rally", "Oil slips"]
            .iter()
            .filter_map(Headline::new)
            .collect()
    }

    #[test]
    fn test_report_without_research() {
        let report = assemble_report(&headlines(), " Mostly bullish. ", None);
        assert_eq!(
            report.to_string(),
            "## Headlines\n- Stocks rally\n- Oil slips\n\n## Analysis\nMostly bullish."
        );
        assert!(!report.has_final_answer());
    }

    #[test]
    fn test_final_answer_section() {
        let outcome = RunOutcome::Completed {
            answer: "IBM looks stable.".to_string(),
        };
        let report = assemble_report(&headlines(), "Bullish.", Some(("IBM", &outcome)));
        let text = report.to_string();

        assert!(text.ends_with("## Research: IBM\nFinal answer\nIBM looks stable."));
        assert!(report.has_final_answer());
    }

    #[test]
    fn test_aborted_sections_are_distinguishable() {
        let budget = RunOutcome::Aborted {
            reason: AbortReason::IterationBudgetExhausted { max: 3 },
            partial: Some("Revenue grew 2%.".to_string()),
        };
        let model = RunOutcome::Aborted {
            reason: AbortReason::ModelUnavailable {
                detail: "connection refused".to_string(),
            },
            partial: None,
        };

        let budget_text = assemble_report(&[], "", Some(("IBM", &budget))).to_string();
        assert!(budget_text.contains("Aborted: iteration budget exhausted\n"));
        assert!(budget_text.contains("**Reason**: iteration budget exhausted after 3 passes"));
        assert!(budget_text.contains("Partial result:\nRevenue grew 2%."));
        assert!(!budget_text.contains("Final answer"));

        let model_text = assemble_report(&[], "", Some(("IBM", &model))).to_string();
        assert!(model_text.contains("Aborted: model unavailable\n"));
        assert!(model_text.contains("No partial result."));
        assert!(model_text.contains("(no headlines were available)"));
    }

    #[test]
    fn test_cancelled_label() {
        let outcome = RunOutcome::Aborted {
            reason: AbortReason::Cancelled,
            partial: None,
        };
        assert_eq!(outcome_label(&outcome), "Aborted: cancelled");
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let outcome = RunOutcome::Completed {
            answer: "done".to_string(),
        };
        let hs = headlines();
        let a = assemble_report(&hs, "x", Some(("IBM", &outcome)));
        let b = assemble_report(&hs, "x", Some(("IBM", &outcome)));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), a.to_string());
        assert_eq!(hs.len(), 2);
    }
}
