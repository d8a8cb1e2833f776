use super::ui;
use crate::core::chart::{ChartPoint, prepare_chart_series};
use crate::core::market::HistoryProvider;
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

/// How many trailing sessions to print.
const TAIL_SESSIONS: usize = 30;

fn build_table(points: &[ChartPoint]) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Fecha"),
        ui::header_cell("Cierre"),
        ui::header_cell("Media 50"),
        ui::header_cell("Media 200"),
    ]);

    for point in points {
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            Cell::new(format!("{:.2}", point.close)),
            ui::format_optional_cell(point.sma50, |v| format!("{v:.2}")),
            ui::format_optional_cell(point.sma200, |v| format!("{v:.2}")),
        ]);
    }

    table
}

/// Fetches one year of history for `symbol` (always fresh, never cached)
/// and prints the tail of the series with its 50- and 200-session moving
/// averages. A provider failure degrades to a warning.
pub async fn run(symbol: &str, provider: &(dyn HistoryProvider)) -> Result<()> {
    let series = match prepare_chart_series(symbol, provider).await {
        Ok(series) => series,
        Err(e) => {
            debug!("Chart fetch failed for {}: {}", symbol, e);
            ui::print_warning(&format!("No se pudo obtener el histórico de {symbol}."));
            return Ok(());
        }
    };

    if series.is_empty() {
        ui::print_warning(&format!("No se pudo obtener el histórico de {symbol}."));
        return Ok(());
    }

    println!(
        "\n{}",
        ui::style_text(
            &format!("Evolución del precio de {symbol} (1 año, medias 50/200)"),
            ui::StyleType::Title
        )
    );
    println!(
        "{}",
        ui::style_text(
            &format!("{} sesiones, últimas {}:", series.len(), TAIL_SESSIONS.min(series.len())),
            ui::StyleType::Subtle
        )
    );

    let tail_start = series.len().saturating_sub(TAIL_SESSIONS);
    println!("{}", build_table(&series[tail_start..]));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::{HistoryRange, PriceBar};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FixedHistoryProvider {
        bars: Vec<PriceBar>,
    }

    #[async_trait]
    impl HistoryProvider for FixedHistoryProvider {
        async fn fetch_history(
            &self,
            _symbol: &str,
            _range: HistoryRange,
        ) -> Result<Vec<PriceBar>> {
            Ok(self.bars.clone())
        }
    }

    struct FailingHistoryProvider;

    #[async_trait]
    impl HistoryProvider for FailingHistoryProvider {
        async fn fetch_history(
            &self,
            symbol: &str,
            _range: HistoryRange,
        ) -> Result<Vec<PriceBar>> {
            Err(anyhow!("No price data found for symbol: {}", symbol))
        }
    }

    #[test]
    fn test_build_table_shows_na_for_missing_averages() {
        let points = vec![ChartPoint {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: 105.0,
            sma50: None,
            sma200: None,
        }];
        let rendered = build_table(&points).to_string();
        assert!(rendered.contains("2024-06-03"));
        assert!(rendered.contains("105.00"));
        assert!(rendered.contains("N/A"));
    }

    #[tokio::test]
    async fn test_run_degrades_provider_failure_to_warning() {
        // Must not propagate the error; the page always finishes rendering.
        let result = run("AAPL", &FailingHistoryProvider).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_with_short_series() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<PriceBar> = (0..10)
            .map(|i| PriceBar {
                date: start + chrono::Duration::days(i),
                open: 100.0,
                close: 100.0 + i as f64,
            })
            .collect();
        let provider = FixedHistoryProvider { bars };
        assert!(run("AAPL", &provider).await.is_ok());
    }
}
