//! External data providers used by the research tools
//!
//! - `sec_edgar`: annual reports from SEC EDGAR
//! - `sentiment`: the CNN Fear & Greed index

pub mod sec_edgar;
pub mod sentiment;

pub use sec_edgar::{CompanyDirectory, CompanyInfo, FilingDocument, SecEdgarClient, SecFiling};
pub use sentiment::{FearGreedClient, SentimentReading};

use crate::error::Result;
use async_trait::async_trait;

/// Source of company filings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilingProvider: Send + Sync {
    /// Newest annual report (10-K) for a company name or ticker
    async fn latest_annual_report(&self, company_or_ticker: &str) -> Result<FilingDocument>;
}

/// Source of a market-wide sentiment reading
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn current(&self) -> Result<SentimentReading>;
}
