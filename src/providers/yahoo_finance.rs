use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::market::{
    HistoryProvider, HistoryRange, MetadataProvider, PriceBar, SymbolMetadata,
};

/// Fetches run one symbol at a time; without a bound, a hanging request
/// would stall every symbol after it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent("bolsa/0.1")
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

// YahooHistoryProvider implementation for HistoryProvider
pub struct YahooHistoryProvider {
    base_url: String,
}

impl YahooHistoryProvider {
    pub fn new(base_url: &str) -> Self {
        YahooHistoryProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Vec<ChartItem>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

fn extract_bars(item: &ChartItem) -> Vec<PriceBar> {
    let (Some(timestamps), Some(quote)) = (
        item.timestamp.as_ref(),
        item.indicators.as_ref().and_then(|inds| inds.quote.first()),
    ) else {
        return Vec::new();
    };
    let (Some(opens), Some(closes)) = (quote.open.as_ref(), quote.close.as_ref()) else {
        return Vec::new();
    };

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = Utc.timestamp_opt(*ts, 0).single()?.date_naive();
            let open = opens.get(i).copied().flatten()?;
            let close = closes.get(i).copied().flatten()?;
            Some(PriceBar { date, open, close })
        })
        .collect()
}

#[async_trait]
impl HistoryProvider for YahooHistoryProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %symbol, range = %range)
    )]
    async fn fetch_history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<PriceBar>> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range={}",
            self.base_url,
            symbol,
            range.as_query_range()
        );
        debug!("Requesting price history from {}", url);

        let client = build_client()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let data = response.json::<YahooChartResponse>().await?;
        let item = data
            .chart
            .result
            .first()
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        let bars = extract_bars(item);
        debug!("Parsed {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

// YahooMetadataProvider implementation for MetadataProvider
pub struct YahooMetadataProvider {
    base_url: String,
}

impl YahooMetadataProvider {
    pub fn new(base_url: &str) -> Self {
        YahooMetadataProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooQuoteSummaryResponse {
    #[serde(alias = "quoteSummary")]
    quote_summary: QuoteSummaryResult,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryResult {
    result: Vec<QuoteSummaryItem>,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryItem {
    #[serde(alias = "assetProfile")]
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
}

#[derive(Deserialize, Debug)]
struct AssetProfile {
    sector: Option<String>,
    country: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PriceModule {
    #[serde(alias = "shortName")]
    short_name: Option<String>,
}

#[async_trait]
impl MetadataProvider for YahooMetadataProvider {
    #[instrument(
        name = "YahooMetadataFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_metadata(&self, symbol: &str) -> Result<SymbolMetadata> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=assetProfile,price",
            self.base_url, symbol
        );
        debug!("Requesting metadata from {}", url);

        let client = build_client()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooQuoteSummaryResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .quote_summary
            .result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No metadata found for symbol: {}", symbol))?;

        Ok(SymbolMetadata {
            short_name: item.price.and_then(|p| p.short_name),
            sector: item.asset_profile.as_ref().and_then(|p| p.sector.clone()),
            country: item.asset_profile.as_ref().and_then(|p| p.country.clone()),
        })
    }
}
