//! The metrics aggregator: per-symbol change metrics over a 90-day window.

use crate::core::cache::Cache;
use crate::core::market::{HistoryProvider, HistoryRange, MetadataProvider, PriceBar};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// A week-over-week change needs the bar six sessions before the latest one.
pub const MIN_BARS_FOR_METRICS: usize = 7;

/// One row of the dashboard, derived from a symbol's price history and
/// metadata. All numeric fields are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    pub country: String,
    pub last_price: f64,
    pub day_change_pct: f64,
    pub week_change_pct: f64,
    pub ytd_change_pct: f64,
}

/// Why a symbol produced no row.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    InsufficientHistory(usize),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::FetchFailed(e) => write!(f, "fetch failed: {e}"),
            SkipReason::InsufficientHistory(n) => {
                write!(f, "insufficient history: {n} bars, need {MIN_BARS_FOR_METRICS}")
            }
        }
    }
}

/// The per-symbol result of an aggregation pass. Skips never abort the
/// run; they are dropped when folding outcomes into a table.
#[derive(Debug, Clone)]
pub enum SymbolOutcome {
    Row(MetricsRow),
    Skipped { symbol: String, reason: SkipReason },
}

/// The assembled dashboard rows, in input symbol order. The table itself
/// is never mutated; sorted and filtered views are derived copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsTable {
    pub rows: Vec<MetricsRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMetric {
    Day,
    Week,
    Ytd,
}

impl SortMetric {
    fn value(&self, row: &MetricsRow) -> f64 {
        match self {
            SortMetric::Day => row.day_change_pct,
            SortMetric::Week => row.week_change_pct,
            SortMetric::Ytd => row.ytd_change_pct,
        }
    }
}

impl MetricsTable {
    pub fn from_outcomes(outcomes: Vec<SymbolOutcome>) -> Self {
        let rows = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                SymbolOutcome::Row(row) => Some(row),
                SymbolOutcome::Skipped { symbol, reason } => {
                    debug!("Skipping {}: {}", symbol, reason);
                    None
                }
            })
            .collect();
        MetricsTable { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows sorted descending by the chosen change metric.
    pub fn sorted_by(&self, metric: SortMetric) -> Vec<MetricsRow> {
        let mut rows = self.rows.clone();
        sort_rows_desc(&mut rows, metric);
        rows
    }

    /// Rows whose ticker contains `query`, case-insensitively. An empty
    /// query returns the full table.
    pub fn filter_by_ticker(&self, query: &str) -> Vec<MetricsRow> {
        if query.is_empty() {
            return self.rows.clone();
        }
        let needle = query.to_uppercase();
        self.rows
            .iter()
            .filter(|row| row.ticker.contains(&needle))
            .cloned()
            .collect()
    }
}

/// Sorts rows in place, descending by the chosen change metric.
pub fn sort_rows_desc(rows: &mut [MetricsRow], metric: SortMetric) {
    rows.sort_by(|a, b| {
        metric
            .value(b)
            .partial_cmp(&metric.value(a))
            .unwrap_or(Ordering::Equal)
    });
}

/// Rounds half away from zero, matching spreadsheet-style display values.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derives a row from a symbol's bars (oldest to newest) and metadata.
/// "YTD" is a display label only: the figure is change over the fetched
/// window, not calendar year-to-date.
pub fn compute_row(
    ticker: &str,
    bars: &[PriceBar],
    metadata: &crate::core::market::SymbolMetadata,
) -> Result<MetricsRow, SkipReason> {
    let n = bars.len();
    if n < MIN_BARS_FOR_METRICS {
        return Err(SkipReason::InsufficientHistory(n));
    }

    let latest = &bars[n - 1];
    let week_ago = &bars[n - MIN_BARS_FOR_METRICS];
    let first = &bars[0];

    let day = (latest.close - latest.open) / latest.open * 100.0;
    let week = (latest.close - week_ago.close) / week_ago.close * 100.0;
    let ytd = (latest.close - first.close) / first.close * 100.0;

    Ok(MetricsRow {
        ticker: ticker.to_string(),
        name: metadata.short_name.clone().unwrap_or_default(),
        sector: metadata.sector.clone().unwrap_or_else(|| "N/A".to_string()),
        country: metadata.country.clone().unwrap_or_else(|| "N/A".to_string()),
        last_price: round2(latest.close),
        day_change_pct: round2(day),
        week_change_pct: round2(week),
        ytd_change_pct: round2(ytd),
    })
}

/// Fetches and folds the dashboard table for a symbol list. The cache is
/// keyed by the symbol list value, so the whole aggregation is reused
/// within its TTL without touching the providers.
pub struct Aggregator<'a> {
    history_provider: &'a (dyn HistoryProvider),
    metadata_provider: &'a (dyn MetadataProvider),
    cache: &'a Cache<Vec<String>, MetricsTable>,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        history_provider: &'a (dyn HistoryProvider),
        metadata_provider: &'a (dyn MetadataProvider),
        cache: &'a Cache<Vec<String>, MetricsTable>,
    ) -> Self {
        Aggregator {
            history_provider,
            metadata_provider,
            cache,
        }
    }

    /// Returns the table for `symbols`, recomputing on cache miss.
    /// `update_callback` is invoked once per symbol processed, for
    /// progress reporting; a cache hit reports nothing.
    pub async fn aggregate(
        &self,
        symbols: &[String],
        update_callback: &(dyn Fn() + Sync),
    ) -> MetricsTable {
        let key = symbols.to_vec();
        if let Some(table) = self.cache.get(&key).await {
            return table;
        }

        let outcomes = self.collect_outcomes(symbols, update_callback).await;
        let table = MetricsTable::from_outcomes(outcomes);
        self.cache.put(key, table.clone()).await;
        table
    }

    /// Processes symbols strictly in order, one at a time. Every symbol
    /// yields an outcome; a failure for one never aborts the rest.
    pub async fn collect_outcomes(
        &self,
        symbols: &[String],
        update_callback: &(dyn Fn() + Sync),
    ) -> Vec<SymbolOutcome> {
        let mut outcomes = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let outcome = self.process_symbol(symbol).await;
            update_callback();
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn process_symbol(&self, symbol: &str) -> SymbolOutcome {
        let bars = match self
            .history_provider
            .fetch_history(symbol, HistoryRange::NinetyDays)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                debug!("History fetch failed for {}: {}", symbol, e);
                return SymbolOutcome::Skipped {
                    symbol: symbol.to_string(),
                    reason: SkipReason::FetchFailed(e.to_string()),
                };
            }
        };

        let metadata = match self.metadata_provider.fetch_metadata(symbol).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Metadata fetch failed for {}: {}", symbol, e);
                return SymbolOutcome::Skipped {
                    symbol: symbol.to_string(),
                    reason: SkipReason::FetchFailed(e.to_string()),
                };
            }
        };

        match compute_row(symbol, &bars, &metadata) {
            Ok(row) => SymbolOutcome::Row(row),
            Err(reason) => SymbolOutcome::Skipped {
                symbol: symbol.to_string(),
                reason,
            },
        }
    }
}
