//! Terminal rendering of a news brief

use agent_news::{CompanyResearch, NewsBrief};
use agent_runtime::Transcript;
use agent_utils::preview;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::fmt::Write as _;

const TRANSCRIPT_CELL_CHARS: usize = 240;

/// Every report, separated by a rule
pub fn render_reports(brief: &NewsBrief) -> String {
    brief
        .reports
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// One table per research run
pub fn render_transcripts(research: &[CompanyResearch]) -> String {
    let mut out = String::new();
    for item in research {
        let run = &item.report.run;
        let _ = writeln!(
            out,
            "\nTranscript: {} ({} passes, run {})",
            item.subject,
            run.iteration_count(),
            run.id()
        );
        let _ = writeln!(out, "{}", transcript_table(run.transcript()));
    }
    out
}

fn transcript_table(transcript: &Transcript) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Step", "Text"]);

    for (idx, entry) in transcript.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            entry.label().to_string(),
            preview(&entry.text(), TRANSCRIPT_CELL_CHARS),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_news::assemble_report;
    use agent_runtime::{AgentRun, ObservationSource, RunOutcome, RunReport};

    fn run_with_answer(answer: &str) -> RunReport {
        let mut run = AgentRun::new(Default::default(), "Assess IBM");
        run.record_thought("check the filing").unwrap();
        run.record_action("SECFilings", "IBM").unwrap();
        run.record_observation("Revenue grew 2%", ObservationSource::Tool)
            .unwrap();
        run.finish(answer).unwrap();
        RunReport {
            outcome: RunOutcome::Completed {
                answer: answer.to_string(),
            },
            run,
        }
    }

    #[test]
    fn test_transcript_table_lists_entries() {
        let research = vec![CompanyResearch {
            subject: "IBM".to_string(),
            report: run_with_answer("IBM looks stable."),
        }];
        let text = render_transcripts(&research);

        assert!(text.contains("Transcript: IBM (1 passes"));
        assert!(text.contains("Thought"));
        assert!(text.contains("SECFilings(IBM)"));
        assert!(text.contains("Final Answer"));
    }

    #[test]
    fn test_reports_are_separated() {
        let report = assemble_report(&[], "Calm markets.", None);
        let brief = NewsBrief {
            headlines: Vec::new(),
            source_failures: Vec::new(),
            analysis: "Calm markets.".to_string(),
            research: Vec::new(),
            reports: vec![report.clone(), report],
        };
        let text = render_reports(&brief);
        assert_eq!(text.matches("## Analysis").count(), 2);
        assert!(text.contains("\n---\n"));
    }
}
