//! Configuration for the news desk

use crate::error::{NewsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Yahoo Finance latest-news page
pub const DEFAULT_YAHOO_URL: &str = "https://finance.yahoo.com/topic/latest-news/";

/// Section labels Yahoo renders as `h3` that are not headlines
pub const GENERIC_HEADLINES: [&str; 6] = [
    "News",
    "Life",
    "Entertainment",
    "Finance",
    "Sports",
    "New on Yahoo",
];

/// Headline source to fetch from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Scraped Yahoo Finance latest-news page (no API key required)
    Yahoo,
    /// Finnhub general market news (requires `FINNHUB_API_KEY`)
    Finnhub,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Finnhub => "finnhub",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "finnhub" => Ok(Self::Finnhub),
            other => Err(NewsError::Config(format!("Unknown headline source '{other}'"))),
        }
    }
}

/// Language model backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI or an OpenAI-compatible server
    OpenAI,
    /// Anthropic Messages API
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(NewsError::Config(format!("Unknown model provider '{other}'"))),
        }
    }
}

/// Configuration for the news desk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Headline sources, fetched in this order
    pub sources: Vec<SourceKind>,

    /// Page scraped by the Yahoo source
    pub yahoo_url: String,

    /// Finnhub API key
    pub finnhub_api_key: Option<String>,

    /// Headlines dropped from scraped pages
    pub generic_headlines: Vec<String>,

    /// Model backend
    pub provider: ProviderKind,

    /// Model for headline analysis
    pub fast_model: String,

    /// Model for research and filing summaries
    pub capable_model: String,

    /// Research iteration budget
    pub max_iterations: usize,

    /// User-Agent sent to SEC EDGAR (the SEC asks for a name and a contact)
    pub sec_user_agent: String,

    /// Characters of filing text handed to the model
    pub filing_char_budget: usize,

    /// Timeout for every outbound HTTP request
    pub request_timeout: Duration,

    /// Directory of `.j2` files overriding the built-in prompts
    pub prompts_dir: Option<PathBuf>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            sources: vec![SourceKind::Yahoo],
            yahoo_url: DEFAULT_YAHOO_URL.to_string(),
            finnhub_api_key: None,
            generic_headlines: GENERIC_HEADLINES.iter().map(ToString::to_string).collect(),
            provider: ProviderKind::Ollama,
            fast_model: "mistral".to_string(),
            capable_model: "llama3".to_string(),
            max_iterations: 10,
            sec_user_agent: "newsdesk (newsdesk@example.com)".to_string(),
            filing_char_budget: 20_000,
            request_timeout: Duration::from_secs(30),
            prompts_dir: None,
        }
    }
}

impl NewsConfig {
    /// Create a new configuration builder
    pub fn builder() -> NewsConfigBuilder {
        NewsConfigBuilder::default()
    }

    /// Defaults overridden by `NEWSDESK_*` environment variables
    ///
    /// | variable | field |
    /// |---|---|
    /// | `NEWSDESK_SOURCES` | comma separated `yahoo`, `finnhub` |
    /// | `NEWSDESK_YAHOO_URL` | `yahoo_url` |
    /// | `NEWSDESK_PROVIDER` | `ollama`, `openai`, `anthropic` |
    /// | `NEWSDESK_FAST_MODEL` / `NEWSDESK_CAPABLE_MODEL` | model ids |
    /// | `NEWSDESK_MAX_ITERATIONS` | research budget |
    /// | `NEWSDESK_SEC_USER_AGENT` | SEC User-Agent |
    /// | `NEWSDESK_TIMEOUT_SECS` | request timeout |
    /// | `NEWSDESK_PROMPTS_DIR` | prompt overrides |
    /// | `FINNHUB_API_KEY` | Finnhub key |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`NewsConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(sources) = lookup("NEWSDESK_SOURCES") {
            config.sources = sources
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(SourceKind::from_str)
                .collect::<Result<_>>()?;
        }
        if let Some(url) = lookup("NEWSDESK_YAHOO_URL") {
            config.yahoo_url = url;
        }
        if let Some(provider) = lookup("NEWSDESK_PROVIDER") {
            config.provider = provider.parse()?;
        }
        if let Some(model) = lookup("NEWSDESK_FAST_MODEL") {
            config.fast_model = model;
        }
        if let Some(model) = lookup("NEWSDESK_CAPABLE_MODEL") {
            config.capable_model = model;
        }
        if let Some(max) = lookup("NEWSDESK_MAX_ITERATIONS") {
            config.max_iterations = parse_number("NEWSDESK_MAX_ITERATIONS", &max)?;
        }
        if let Some(agent) = lookup("NEWSDESK_SEC_USER_AGENT") {
            config.sec_user_agent = agent;
        }
        if let Some(secs) = lookup("NEWSDESK_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_number("NEWSDESK_TIMEOUT_SECS", &secs)?);
        }
        if let Some(dir) = lookup("NEWSDESK_PROMPTS_DIR") {
            config.prompts_dir = Some(PathBuf::from(dir));
        }
        config.finnhub_api_key = lookup("FINNHUB_API_KEY").filter(|k| !k.trim().is_empty());

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(NewsError::Config(
                "at least one headline source is required".to_string(),
            ));
        }

        if self.sources.contains(&SourceKind::Finnhub) && self.finnhub_api_key.is_none() {
            return Err(NewsError::Config(
                "Finnhub API key required when the finnhub source is enabled".to_string(),
            ));
        }

        let url = url::Url::parse(&self.yahoo_url)
            .map_err(|e| NewsError::Config(format!("invalid yahoo_url '{}': {e}", self.yahoo_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NewsError::Config(format!(
                "yahoo_url must be http(s), got '{}'",
                url.scheme()
            )));
        }

        if self.fast_model.trim().is_empty() || self.capable_model.trim().is_empty() {
            return Err(NewsError::Config("model names must not be empty".to_string()));
        }

        if self.max_iterations == 0 {
            return Err(NewsError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.filing_char_budget == 0 {
            return Err(NewsError::Config(
                "filing_char_budget must be greater than 0".to_string(),
            ));
        }

        if self.sec_user_agent.trim().is_empty() {
            return Err(NewsError::Config(
                "sec_user_agent must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| NewsError::Config(format!("{key}: {e}")))
}

/// Builder for NewsConfig
#[derive(Debug, Default)]
pub struct NewsConfigBuilder {
    sources: Option<Vec<SourceKind>>,
    yahoo_url: Option<String>,
    finnhub_api_key: Option<String>,
    provider: Option<ProviderKind>,
    fast_model: Option<String>,
    capable_model: Option<String>,
    max_iterations: Option<usize>,
    sec_user_agent: Option<String>,
    filing_char_budget: Option<usize>,
    request_timeout: Option<Duration>,
    prompts_dir: Option<PathBuf>,
}

impl NewsConfigBuilder {
    /// Set the headline sources
    pub fn sources(mut self, sources: Vec<SourceKind>) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Set the Yahoo page URL
    pub fn yahoo_url(mut self, url: impl Into<String>) -> Self {
        self.yahoo_url = Some(url.into());
        self
    }

    /// Set the Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Set the model backend
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the fast model id
    pub fn fast_model(mut self, model: impl Into<String>) -> Self {
        self.fast_model = Some(model.into());
        self
    }

    /// Set the capable model id
    pub fn capable_model(mut self, model: impl Into<String>) -> Self {
        self.capable_model = Some(model.into());
        self
    }

    /// Set the research iteration budget
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Set the SEC User-Agent
    pub fn sec_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.sec_user_agent = Some(agent.into());
        self
    }

    /// Set the filing text budget
    pub fn filing_char_budget(mut self, chars: usize) -> Self {
        self.filing_char_budget = Some(chars);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the prompt override directory
    pub fn prompts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompts_dir = Some(dir.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<NewsConfig> {
        let defaults = NewsConfig::default();

        let config = NewsConfig {
            sources: self.sources.unwrap_or(defaults.sources),
            yahoo_url: self.yahoo_url.unwrap_or(defaults.yahoo_url),
            finnhub_api_key: self.finnhub_api_key,
            generic_headlines: defaults.generic_headlines,
            provider: self.provider.unwrap_or(defaults.provider),
            fast_model: self.fast_model.unwrap_or(defaults.fast_model),
            capable_model: self.capable_model.unwrap_or(defaults.capable_model),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            sec_user_agent: self.sec_user_agent.unwrap_or(defaults.sec_user_agent),
            filing_char_budget: self
                .filing_char_budget
                .unwrap_or(defaults.filing_char_budget),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            prompts_dir: self.prompts_dir,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = NewsConfig::default();
        assert_eq!(config.sources, vec![SourceKind::Yahoo]);
        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.generic_headlines.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = NewsConfig::builder()
            .provider(ProviderKind::OpenAI)
            .fast_model("gpt-4o-mini")
            .capable_model("gpt-4o")
            .max_iterations(4)
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.provider, ProviderKind::OpenAI);
        assert_eq!(config.capable_model, "gpt-4o");
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validation_rejects_zero_budget() {
        let err = NewsConfig::builder().max_iterations(0).build().unwrap_err();
        assert!(err.to_string().contains("max_iterations"));
    }

    #[test]
    fn test_validation_rejects_empty_model() {
        assert!(NewsConfig::builder().fast_model(" ").build().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        assert!(NewsConfig::builder().yahoo_url("not a url").build().is_err());
        assert!(NewsConfig::builder().yahoo_url("ftp://example.com").build().is_err());
    }

    #[test]
    fn test_validation_finnhub_needs_key() {
        let config = NewsConfig {
            sources: vec![SourceKind::Finnhub],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = NewsConfig {
            sources: vec![SourceKind::Finnhub],
            finnhub_api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("NEWSDESK_SOURCES", "yahoo, finnhub"),
            ("NEWSDESK_PROVIDER", "anthropic"),
            ("NEWSDESK_MAX_ITERATIONS", "3"),
            ("NEWSDESK_TIMEOUT_SECS", "12"),
            ("FINNHUB_API_KEY", "secret"),
        ]);
        let config =
            NewsConfig::from_lookup(|key| vars.get(key).map(ToString::to_string)).unwrap();

        assert_eq!(config.sources, vec![SourceKind::Yahoo, SourceKind::Finnhub]);
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.finnhub_api_key.as_deref(), Some("secret"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = NewsConfig::from_lookup(|key| {
            (key == "NEWSDESK_MAX_ITERATIONS").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("NEWSDESK_MAX_ITERATIONS"));

        assert!(
            NewsConfig::from_lookup(|key| (key == "NEWSDESK_SOURCES").then(|| "rss".to_string()))
                .is_err()
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert_eq!(" yahoo ".parse::<SourceKind>().unwrap(), SourceKind::Yahoo);
        assert_eq!(SourceKind::Finnhub.to_string(), "finnhub");
    }
}
