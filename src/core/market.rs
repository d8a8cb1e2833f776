//! Market-data abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One trading session's open/close prices for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

/// Trailing window requested from the history provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryRange {
    /// 90 trading days, used by the metrics aggregator.
    NinetyDays,
    /// One year, used by the single-symbol chart.
    OneYear,
}

impl HistoryRange {
    /// The `range` query parameter value understood by the Yahoo chart API.
    pub fn as_query_range(&self) -> &'static str {
        match self {
            HistoryRange::NinetyDays => "90d",
            HistoryRange::OneYear => "1y",
        }
    }
}

impl Display for HistoryRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_query_range())
    }
}

impl FromStr for HistoryRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "90d" => Ok(HistoryRange::NinetyDays),
            "1y" => Ok(HistoryRange::OneYear),
            _ => Err(anyhow::anyhow!("Invalid history range: {}", s)),
        }
    }
}

/// Descriptive attributes for a symbol. Every field is optional; display
/// code substitutes defaults for missing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolMetadata {
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub country: Option<String>,
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetches daily bars for `symbol` over the trailing `range`,
    /// ordered oldest to newest.
    async fn fetch_history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<PriceBar>>;
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_metadata(&self, symbol: &str) -> Result<SymbolMetadata>;
}
