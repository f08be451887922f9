//! Command-line arguments

use agent_news::{NewsConfig, ProviderKind};
use agent_utils::LogConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "newsdesk")]
#[command(version, about = "Financial news digest with optional company research", long_about = None)]
pub struct Args {
    /// Company or ticker to research (repeatable)
    #[arg(short, long = "company", value_name = "NAME", env = "NEWSDESK_COMPANIES", value_delimiter = ',')]
    pub companies: Vec<String>,

    /// Research iteration budget per company
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Model provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model used for headline analysis
    #[arg(long, value_name = "MODEL")]
    pub fast_model: Option<String>,

    /// Model used for research and filing summaries
    #[arg(long, value_name = "MODEL")]
    pub capable_model: Option<String>,

    /// Directory of .j2 / .jinja prompt overrides
    #[arg(long, value_name = "DIR")]
    pub prompts_dir: Option<PathBuf>,

    /// Only collect and analyze headlines
    #[arg(long)]
    pub no_research: bool,

    /// Print each research transcript as a table
    #[arg(long)]
    pub show_transcript: bool,

    /// Write logs to stderr as JSON
    #[arg(long)]
    pub log_json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderArg {
    Ollama,
    Openai,
    Anthropic,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Ollama => ProviderKind::Ollama,
            ProviderArg::Openai => ProviderKind::OpenAI,
            ProviderArg::Anthropic => ProviderKind::Anthropic,
        }
    }
}

impl Args {
    /// Flags override whatever `config` was loaded with
    pub fn apply(&self, config: &mut NewsConfig) {
        if let Some(max) = self.max_iterations {
            config.max_iterations = max;
        }
        if let Some(provider) = self.provider {
            config.provider = provider.into();
        }
        if let Some(model) = &self.fast_model {
            config.fast_model.clone_from(model);
        }
        if let Some(model) = &self.capable_model {
            config.capable_model.clone_from(model);
        }
        if let Some(dir) = &self.prompts_dir {
            config.prompts_dir = Some(dir.clone());
        }
    }

    /// Companies to research, empty when research is disabled
    pub fn research_targets(&self) -> Vec<String> {
        if self.no_research {
            return Vec::new();
        }
        self.companies
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn log_config(&self) -> LogConfig {
        let config = LogConfig::default();
        if self.log_json { config.json() } else { config }
    }
}
