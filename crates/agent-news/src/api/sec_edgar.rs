//! SEC EDGAR client for annual reports
//!
//! SEC EDGAR is the Electronic Data Gathering, Analysis, and Retrieval system
//! used by the U.S. Securities and Exchange Commission.
//!
//! Rate limit: 10 requests per second (as per SEC fair access policy)
//! User-Agent requirement: Must include company name and contact email

use super::FilingProvider;
use crate::config::NewsConfig;
use crate::error::{NewsError, Result};
use crate::html::{html_to_text, truncate_chars};
use async_trait::async_trait;
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, info, instrument};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const PROVIDER: &str = "SEC EDGAR";
const SEC_BASE_URL: &str = "https://data.sec.gov";
const SEC_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";
const SEC_COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const ANNUAL_REPORT_FORM: &str = "10-K";

/// One row of the SEC company tickers directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Central Index Key (CIK)
    #[serde(rename = "cik_str")]
    pub cik: u64,
    /// Stock ticker symbol
    pub ticker: String,
    /// Registered company name
    pub title: String,
}

impl CompanyInfo {
    /// CIK zero-padded to the 10 digits EDGAR URLs use
    pub fn padded_cik(&self) -> String {
        format!("{:010}", self.cik)
    }
}

/// The SEC company tickers directory
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    companies: Vec<CompanyInfo>,
}

impl CompanyDirectory {
    /// Parse `company_tickers.json`, keeping the file's row order
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: HashMap<String, CompanyInfo> = serde_json::from_str(json)?;
        let mut rows: Vec<(usize, CompanyInfo)> = rows
            .into_iter()
            .map(|(key, info)| (key.parse().unwrap_or(usize::MAX), info))
            .collect();
        rows.sort_by_key(|(idx, _)| *idx);

        Ok(Self {
            companies: rows.into_iter().map(|(_, info)| info).collect(),
        })
    }

    /// Find a company by ticker or by name, ignoring case
    ///
    /// Tickers win over names; an exact name wins over a name that merely
    /// starts with `query`.
    pub fn find(&self, query: &str) -> Option<&CompanyInfo> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let lowered = query.to_lowercase();

        self.companies
            .iter()
            .find(|c| c.ticker.eq_ignore_ascii_case(query))
            .or_else(|| {
                self.companies
                    .iter()
                    .find(|c| c.title.to_lowercase() == lowered)
            })
            .or_else(|| {
                self.companies
                    .iter()
                    .find(|c| c.title.to_lowercase().starts_with(&lowered))
            })
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

/// SEC submissions response (only what is needed to locate filings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySubmissions {
    pub name: String,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
}

/// Column-oriented list of recent filings, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<NaiveDate>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

/// SEC filing metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecFiling {
    /// Accession number (unique filing identifier)
    pub accession_number: String,
    /// Filing type (10-K, 10-Q, 8-K, etc.)
    pub form_type: String,
    /// Filing date
    pub filing_date: NaiveDate,
    /// Primary document filename
    pub primary_document: String,
}

impl RecentFilings {
    /// Newest filing of `form`
    pub fn latest(&self, form: &str) -> Option<SecFiling> {
        let idx = self.form.iter().position(|f| f == form)?;
        Some(SecFiling {
            accession_number: self.accession_number.get(idx)?.clone(),
            form_type: self.form[idx].clone(),
            filing_date: *self.filing_date.get(idx)?,
            primary_document: self.primary_document.get(idx)?.clone(),
        })
    }
}

/// Text of a company's filing, ready for a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingDocument {
    pub company: String,
    pub ticker: String,
    pub form_type: String,
    pub filing_date: NaiveDate,
    pub url: String,
    /// Plain text, cut to the configured character budget
    pub text: String,
    /// Whether `text` was cut
    pub truncated: bool,
}

/// Build URL to access a filing document
pub fn filing_url(cik: u64, accession_number: &str, document: &str) -> String {
    let accession_clean = accession_number.replace('-', "");
    format!("{SEC_ARCHIVES_URL}/{cik}/{accession_clean}/{document}")
}

/// SEC EDGAR API client
pub struct SecEdgarClient {
    client: Client,
    user_agent: String,
    char_budget: usize,
    rate_limiter: SharedRateLimiter,
}

impl SecEdgarClient {
    /// Create a new SEC EDGAR client
    ///
    /// # Arguments
    /// * `user_agent` - "AppName (contact@example.com)", as the SEC requires
    /// * `char_budget` - Characters of filing text to keep
    pub fn new(client: Client, user_agent: impl Into<String>, char_budget: usize) -> Self {
        // SEC allows 10 requests per second
        let quota = Quota::per_second(NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN));

        Self {
            client,
            user_agent: user_agent.into(),
            char_budget,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        Ok(Self::new(
            crate::sources::http_client(config.request_timeout)?,
            config.sec_user_agent.clone(),
            config.filing_char_budget,
        ))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.until_ready().await;
        debug!(url, "SEC request");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NewsError::api(
                PROVIDER,
                format!("{} returned {}", url, response.status()),
            ));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get(url).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Download the company tickers directory
    pub async fn company_directory(&self) -> Result<CompanyDirectory> {
        let body = self.get(SEC_COMPANY_TICKERS_URL).await?.text().await?;
        CompanyDirectory::from_json(&body)
    }

    /// Get company submissions (filing history)
    pub async fn company_submissions(&self, company: &CompanyInfo) -> Result<CompanySubmissions> {
        let url = format!("{SEC_BASE_URL}/submissions/CIK{}.json", company.padded_cik());
        self.get_json(&url).await
    }

    /// Download a filing document and convert it to plain text
    pub async fn filing_text(&self, url: &str) -> Result<String> {
        let html = self.get(url).await?.text().await?;
        Ok(html_to_text(&html))
    }
}

#[async_trait]
impl FilingProvider for SecEdgarClient {
    #[instrument(skip(self))]
    async fn latest_annual_report(&self, company_or_ticker: &str) -> Result<FilingDocument> {
        let directory = self.company_directory().await?;
        let company = directory
            .find(company_or_ticker)
            .ok_or_else(|| NewsError::CompanyNotFound(company_or_ticker.to_string()))?;

        let submissions = self.company_submissions(company).await?;
        let filing = submissions
            .filings
            .recent
            .latest(ANNUAL_REPORT_FORM)
            .ok_or_else(|| NewsError::FilingNotFound {
                company: company.title.clone(),
                form: ANNUAL_REPORT_FORM.to_string(),
            })?;

        let url = filing_url(company.cik, &filing.accession_number, &filing.primary_document);
        let full_text = self.filing_text(&url).await?;
        let text = truncate_chars(&full_text, self.char_budget);
        let truncated = text.len() < full_text.len();

        info!(
            ticker = %company.ticker,
            filing_date = %filing.filing_date,
            chars = text.chars().count(),
            truncated,
            "Fetched annual report"
        );

        Ok(FilingDocument {
            company: company.title.clone(),
            ticker: company.ticker.clone(),
            form_type: filing.form_type,
            filing_date: filing.filing_date,
            url,
            text: text.to_string(),
            truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKERS: &str = r#"{
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 51143, "ticker": "IBM", "title": "INTERNATIONAL BUSINESS MACHINES CORP"},
        "2": {"cik_str": 1018724, "ticker": "AMZN", "title": "AMAZON COM INC"},
        "10": {"cik_str": 999, "ticker": "APLE", "title": "Apple Hospitality REIT, Inc."}
    }"#;

    #[test]
    fn test_directory_keeps_file_order() {
        let directory = CompanyDirectory::from_json(TICKERS).unwrap();
        assert_eq!(directory.len(), 4);
        assert_eq!(directory.companies[3].ticker, "APLE");
    }

    #[test]
    fn test_find_by_ticker_and_name() {
        let directory = CompanyDirectory::from_json(TICKERS).unwrap();

        assert_eq!(directory.find("ibm").unwrap().cik, 51143);
        assert_eq!(
            directory
                .find("International Business Machines Corp")
                .unwrap()
                .ticker,
            "IBM"
        );
        // Prefix match picks the earlier row
        assert_eq!(directory.find("apple").unwrap().ticker, "AAPL");
        assert!(directory.find("Nonexistent Holdings").is_none());
        assert!(directory.find("  ").is_none());
    }

    #[test]
    fn test_padded_cik() {
        let directory = CompanyDirectory::from_json(TICKERS).unwrap();
        assert_eq!(directory.find("IBM").unwrap().padded_cik(), "0000051143");
    }

    #[test]
    fn test_latest_annual_report_is_newest_10k() {
        let recent: RecentFilings = serde_json::from_str(
            r#"{
                "accessionNumber": ["0000051143-25-000010", "0000051143-25-000002", "0000051143-24-000003"],
                "filingDate": ["2025-04-24", "2025-02-25", "2024-02-26"],
                "form": ["10-Q", "10-K", "10-K"],
                "primaryDocument": ["ibm-q1.htm", "ibm-20241231.htm", "ibm-20231231.htm"]
            }"#,
        )
        .unwrap();

        let filing = recent.latest("10-K").unwrap();
        assert_eq!(filing.filing_date, NaiveDate::from_ymd_opt(2025, 2, 25).unwrap());
        assert_eq!(filing.primary_document, "ibm-20241231.htm");
        assert!(recent.latest("8-K").is_none());
    }

    #[test]
    fn test_filing_url() {
        assert_eq!(
            filing_url(51143, "0000051143-25-000002", "ibm-20241231.htm"),
            "https://www.sec.gov/Archives/edgar/data/51143/000005114325000002/ibm-20241231.htm"
        );
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_latest_annual_report_live() {
        let client = SecEdgarClient::from_config(&NewsConfig::default()).unwrap();
        let doc = client.latest_annual_report("IBM").await.unwrap();
        assert_eq!(doc.ticker, "IBM");
        assert_eq!(doc.form_type, "10-K");
        assert!(!doc.text.is_empty());
    }
}
