use std::fs;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Builds a Yahoo chart response with the given closes; the last bar
    /// opens at `last_open`, every other bar opens at its close.
    pub fn chart_response(closes: &[f64], last_open: f64) -> String {
        let base_ts: i64 = 1704067200; // 2024-01-01
        let n = closes.len();
        let timestamps: Vec<String> = (0..n)
            .map(|i| (base_ts + i as i64 * 86_400).to_string())
            .collect();
        let opens: Vec<String> = closes
            .iter()
            .enumerate()
            .map(|(i, c)| if i == n - 1 { last_open } else { *c }.to_string())
            .collect();
        let closes: Vec<String> = closes.iter().map(|c| c.to_string()).collect();

        format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "timestamp": [{}],
                        "indicators": {{
                            "quote": [{{
                                "open": [{}],
                                "close": [{}]
                            }}]
                        }}
                    }}]
                }}
            }}"#,
            timestamps.join(", "),
            opens.join(", "),
            closes.join(", ")
        )
    }

    pub fn quote_summary_response(short_name: &str, sector: &str, country: &str) -> String {
        format!(
            r#"{{
                "quoteSummary": {{
                    "result": [{{
                        "assetProfile": {{
                            "sector": "{sector}",
                            "country": "{country}"
                        }},
                        "price": {{
                            "shortName": "{short_name}"
                        }}
                    }}]
                }}
            }}"#
        )
    }

    pub async fn mount_symbol(
        mock_server: &MockServer,
        symbol: &str,
        chart_body: &str,
        summary_body: &str,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/v8/finance/chart/{symbol}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(chart_body))
            .mount(mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v10/finance/quoteSummary/{symbol}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(summary_body))
            .mount(mock_server)
            .await;
    }

    pub fn config_content(tickers: &[&str], base_url: &str) -> String {
        let ticker_lines: Vec<String> =
            tickers.iter().map(|t| format!("  - \"{t}\"")).collect();
        format!(
            "tickers:\n{}\nproviders:\n  yahoo:\n    base_url: {}\n",
            ticker_lines.join("\n"),
            base_url
        )
    }
}

#[test_log::test(tokio::test)]
async fn test_full_dashboard_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;

    let chart = test_utils::chart_response(&[100.0, 102.0, 99.0, 101.0, 103.0, 98.0, 105.0], 104.0);
    let summary = test_utils::quote_summary_response("Apple Inc.", "Technology", "United States");
    test_utils::mount_symbol(&mock_server, "AAPL", &chart, &summary).await;
    // MSFT has no mounted mocks; its 404 must be skipped silently.

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    fs::write(
        config_path,
        test_utils::config_content(&["AAPL", "MSFT"], &mock_server.uri()),
    )
    .expect("Failed to write config file");

    let result = bolsa::run_command(
        bolsa::AppCommand::Dashboard { filter: None },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Dashboard command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_dashboard_flow_with_filter() {
    let mock_server = wiremock::MockServer::start().await;

    let chart = test_utils::chart_response(&[100.0, 102.0, 99.0, 101.0, 103.0, 98.0, 105.0], 104.0);
    let summary = test_utils::quote_summary_response("Apple Inc.", "Technology", "United States");
    test_utils::mount_symbol(&mock_server, "AAPL", &chart, &summary).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        test_utils::config_content(&["AAPL"], &mock_server.uri()),
    )
    .expect("Failed to write config file");

    // Both the match and no-match filter paths render without error.
    for filter in ["aap", "ZZZ"] {
        let result = bolsa::run_command(
            bolsa::AppCommand::Dashboard {
                filter: Some(filter.to_string()),
            },
            Some(config_file.path().to_str().unwrap()),
        )
        .await;
        assert!(
            result.is_ok(),
            "Dashboard with filter {filter:?} failed with: {:?}",
            result.err()
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_dashboard_flow_all_symbols_failing() {
    // Nothing mounted: every fetch 404s and the dashboard renders the
    // empty "no data" state instead of failing.
    let mock_server = wiremock::MockServer::start().await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        test_utils::config_content(&["AAPL", "MSFT"], &mock_server.uri()),
    )
    .expect("Failed to write config file");

    let result = bolsa::run_command(
        bolsa::AppCommand::Dashboard { filter: None },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Dashboard command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_export_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;

    let chart = test_utils::chart_response(&[100.0, 102.0, 99.0, 101.0, 103.0, 98.0, 105.0], 104.0);
    let summary = test_utils::quote_summary_response("Apple Inc.", "Technology", "United States");
    test_utils::mount_symbol(&mock_server, "AAPL", &chart, &summary).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        test_utils::config_content(&["AAPL"], &mock_server.uri()),
    )
    .expect("Failed to write config file");

    let out_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let output = out_dir.path().join("datos_bolsa.xlsx");

    let result = bolsa::run_command(
        bolsa::AppCommand::Export {
            output: Some(output.clone()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Export command failed with: {:?}",
        result.err()
    );

    let bytes = fs::read(&output).expect("Export file missing");
    assert!(bytes.starts_with(b"PK"), "Export is not a zip container");
}

#[test_log::test(tokio::test)]
async fn test_chart_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;

    // 60 rising sessions: enough for a 50-session average tail.
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let chart = test_utils::chart_response(&closes, 158.0);
    let summary = test_utils::quote_summary_response("Apple Inc.", "Technology", "United States");
    test_utils::mount_symbol(&mock_server, "AAPL", &chart, &summary).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        test_utils::config_content(&["AAPL"], &mock_server.uri()),
    )
    .expect("Failed to write config file");

    let result = bolsa::run_command(
        bolsa::AppCommand::Chart {
            symbol: "AAPL".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Chart command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_chart_flow_with_unknown_symbol_warns() {
    let mock_server = wiremock::MockServer::start().await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        test_utils::config_content(&["AAPL"], &mock_server.uri()),
    )
    .expect("Failed to write config file");

    // Chart fetch failures surface as a warning, not an error.
    let result = bolsa::run_command(
        bolsa::AppCommand::Chart {
            symbol: "UNKNOWN".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Chart command failed with: {:?}",
        result.err()
    );
}
