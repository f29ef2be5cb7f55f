use std::fs;
use tracing::{error, info};

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub fn revenue_page(rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(date, revenue)| format!("<tr><td>{date}</td><td>{revenue}</td></tr>"))
            .collect();
        format!(
            r#"<html><body>
            <table><thead><tr><th>Annual Revenue</th></tr></thead>
              <tbody><tr><td>2020</td><td>$31,536</td></tr></tbody></table>
            <table><thead><tr><th>Quarterly Revenue</th></tr></thead>
              <tbody>{body}</tbody></table>
            </body></html>"#
        )
    }

    pub fn chart_response(timestamps: &[i64], closes: &[f64]) -> String {
        let timestamps: Vec<String> = timestamps.iter().map(|t| t.to_string()).collect();
        let closes: Vec<String> = closes.iter().map(|c| c.to_string()).collect();
        format!(
            r#"{{"chart": {{"result": [{{
                "meta": {{"currency": "USD"}},
                "timestamp": [{}],
                "indicators": {{"quote": [{{"close": [{}]}}]}}
            }}], "error": null}}}}"#,
            timestamps.join(","),
            closes.join(",")
        )
    }

    pub async fn mount_page(server: &MockServer, page_path: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    pub async fn mount_chart(server: &MockServer, symbol: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(format!("/v8/finance/chart/{symbol}")))
            .and(query_param("period1", "0"))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }
}

async fn start_servers() -> wiremock::MockServer {
    let server = wiremock::MockServer::start().await;

    test_utils::mount_page(
        &server,
        "/tesla.htm",
        test_utils::revenue_page(&[
            ("2021-06-30", "$11,958"),
            ("2021-03-31", "$10,389"),
            ("2020-12-31", "$10,744"),
            ("2020-09-30", ""),
        ]),
    )
    .await;
    test_utils::mount_page(
        &server,
        "/gamestop.htm",
        test_utils::revenue_page(&[("2021-01-31", "$2,122"), ("2020-10-31", "$1,005")]),
    )
    .await;

    // 2021-06-14 and 2021-06-15 at 13:30 UTC
    test_utils::mount_chart(
        &server,
        "TSLA",
        test_utils::chart_response(&[1623677400, 1623763800], &[617.69, 604.87]),
    )
    .await;
    test_utils::mount_chart(
        &server,
        "GME",
        test_utils::chart_response(&[1623677400, 1623763800], &[236.35, 221.38]),
    )
    .await;

    server
}

fn write_config(dir: &std::path::Path, server_uri: &str, extra: &str) -> std::path::PathBuf {
    let config_path = dir.join("config.yaml");
    let config_content = format!(
        r#"
companies:
  - name: "Tesla"
    symbol: "TSLA"
    revenue_url: "{server_uri}/tesla.htm"
  - name: "GameStop"
    symbol: "GME"
    revenue_url: "{server_uri}/gamestop.htm"
providers:
  yahoo:
    base_url: "{server_uri}"
http:
  retries: 0
{extra}
"#
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path
}

#[test_log::test(tokio::test)]
async fn test_full_chart_flow_with_mock() {
    let server = start_servers().await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &server.uri(), "");
    let output_dir = temp_dir.path().join("charts");

    let result = revchart::run_command(
        revchart::AppCommand::Chart {
            output_dir: Some(output_dir.clone()),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Chart command failed with: {:?}",
        result.err()
    );

    for stem in ["tesla", "gamestop"] {
        let html = fs::read_to_string(output_dir.join(format!("{stem}.html")))
            .expect("chart html should be written");
        let svg = fs::read_to_string(output_dir.join(format!("{stem}.svg")))
            .expect("chart svg should be written");
        assert!(html.starts_with("<figure"));
        assert!(html.contains("Price ($US)"));
        assert!(html.contains("Revenue ($US Millions)"));
        assert!(svg.contains("<svg"));
    }

    let tesla = fs::read_to_string(output_dir.join("tesla.html")).unwrap();
    assert!(tesla.contains("<figcaption>Tesla</figcaption>"));
}

#[test_log::test(tokio::test)]
async fn test_output_dir_from_config() {
    let server = start_servers().await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let output_dir = temp_dir.path().join("from-config");
    let config_path = write_config(
        temp_dir.path(),
        &server.uri(),
        &format!("output_dir: \"{}\"", output_dir.display()),
    );

    revchart::run_command(
        revchart::AppCommand::Chart { output_dir: None },
        Some(config_path.to_str().unwrap()),
    )
    .await
    .expect("Chart command should succeed");

    assert!(output_dir.join("tesla.html").exists());
    assert!(output_dir.join("gamestop.svg").exists());
}

#[test_log::test(tokio::test)]
async fn test_revenue_flow_with_mock() {
    let server = start_servers().await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &server.uri(), "");

    let result = revchart::run_command(
        revchart::AppCommand::Revenue,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Revenue command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_table_fails_run() {
    let server = start_servers().await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        &server.uri(),
        "table:\n  strategy: nth_table_body\n  index: 5",
    );

    let err = revchart::run_command(
        revchart::AppCommand::Chart {
            output_dir: Some(temp_dir.path().join("charts")),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await
    .expect_err("Chart command should fail without a sixth table body");

    assert_eq!(err.to_string(), "Failed to extract revenue for Tesla");
    assert_eq!(
        err.root_cause().to_string(),
        "Expected at least 6 table bodies but found 2"
    );
}

#[test_log::test(tokio::test)]
#[ignore = "requires network access"]
async fn test_real_yahoo_finance_api() {
    use revchart::core::PriceHistoryProvider;
    use revchart::providers::util::RequestPolicy;
    use revchart::providers::yahoo_finance::YahooFinanceProvider;

    let base_url = "https://query1.finance.yahoo.com";
    let provider = YahooFinanceProvider::new(base_url, RequestPolicy::default());

    let symbol = "TSLA";
    info!(?symbol, "Fetching price history from Yahoo Finance");

    match provider.fetch_history(symbol).await {
        Ok(history) => {
            info!(points = history.len(), "Received price history");
            assert!(!history.is_empty(), "History should not be empty");
            assert!(history.iter().all(|p| p.close > 0.0));
        }
        Err(e) => {
            error!("API request failed: {e}\n{e:?}");
            panic!("API request failed: {e}");
        }
    }
}
