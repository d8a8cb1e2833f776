//! One-year price series with moving averages for a single symbol.

use crate::core::market::{HistoryProvider, HistoryRange};
use anyhow::Result;
use chrono::NaiveDate;

pub const SHORT_SMA_WINDOW: usize = 50;
pub const LONG_SMA_WINDOW: usize = 200;

/// One point of the chart series. The averages are `None` until enough
/// sessions have accumulated; they are never substituted with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
}

/// Simple moving average over `window` values. The first `window - 1`
/// positions carry no value; a series shorter than the window is entirely
/// `None`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let sum: f64 = values[i + 1 - window..=i].iter().sum();
                Some(sum / window as f64)
            }
        })
        .collect()
}

/// Fetches one year of bars for `symbol` and decorates the close series
/// with 50- and 200-session moving averages. Always a fresh fetch; chart
/// history is never cached.
pub async fn prepare_chart_series(
    symbol: &str,
    provider: &(dyn HistoryProvider),
) -> Result<Vec<ChartPoint>> {
    let bars = provider.fetch_history(symbol, HistoryRange::OneYear).await?;

    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
    let sma50 = sma(&closes, SHORT_SMA_WINDOW);
    let sma200 = sma(&closes, LONG_SMA_WINDOW);

    Ok(bars
        .iter()
        .zip(sma50)
        .zip(sma200)
        .map(|((bar, sma50), sma200)| ChartPoint {
            date: bar.date,
            close: bar.close,
            sma50,
            sma200,
        })
        .collect())
}
