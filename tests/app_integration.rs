use fxconv::core::{CurrencyCode, FxError, RateProvider, RateTable};
use fxconv::providers::ExchangeRateApiProvider;
use std::time::Duration;
use tracing::{error, info};

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const USD_RATES: &str = r#"{
        "provider": "https://www.exchangerate-api.com",
        "base": "USD",
        "time_last_updated": 1714521601,
        "rates": {
            "USD": 1,
            "EUR": 0.92,
            "GBP": 0.79,
            "PKR": 278.5
        }
    }"#;

    pub async fn create_mock_server(base: &str, response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v4/latest/{base}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_rates_server() -> MockServer {
        create_mock_server("USD", ResponseTemplate::new(200).set_body_string(USD_RATES)).await
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            base_currency: "USD"
            default_from: "EUR"
            default_to: "PKR"
            providers:
              exchangerate_api:
                base_url: {base_url}
                timeout_secs: 5
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn code(s: &str) -> CurrencyCode {
    s.parse().unwrap()
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_server = test_utils::create_rates_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "100".to_string(),
            from: None,
            to: Some("gbp".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_rates_flow_with_mock() {
    let mock_server = test_utils::create_rates_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Rates {
            currencies: vec!["EUR".to_string(), "PKR".to_string(), "JPY".to_string()],
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Rates command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_reports_provider_failure() {
    let mock_server = test_utils::create_mock_server(
        "USD",
        wiremock::ResponseTemplate::new(503),
    )
    .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let err = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "100".to_string(),
            from: Some("USD".to_string()),
            to: Some("PKR".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await
    .unwrap_err();

    match err.downcast_ref::<FxError>() {
        Some(FxError::FetchFailed(message)) => assert!(message.contains("503")),
        other => panic!("Expected FetchFailed, got {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_convert_rejects_invalid_input() {
    // Nothing listens here; invalid input must fail before any request is made.
    let config_file = test_utils::write_config("http://127.0.0.1:9");

    for (amount, to, expected) in [
        ("", "PKR", "InvalidAmount"),
        ("abc", "PKR", "InvalidAmount"),
        ("-5", "PKR", "InvalidAmount"),
        ("10", "RUPEE", "InvalidCurrency"),
    ] {
        let err = fxconv::run_command(
            fxconv::AppCommand::Convert {
                amount: amount.to_string(),
                from: None,
                to: Some(to.to_string()),
            },
            Some(config_file.path().to_str().unwrap()),
        )
        .await
        .unwrap_err();

        let kind = match err.downcast_ref::<FxError>() {
            Some(FxError::InvalidAmount(_)) => "InvalidAmount",
            Some(FxError::InvalidCurrency(_)) => "InvalidCurrency",
            other => panic!("Unexpected error for {amount:?}: {other:?}"),
        };
        assert_eq!(kind, expected);
    }
}

#[test_log::test(tokio::test)]
async fn test_convert_reports_unavailable_rate() {
    let mock_server = test_utils::create_rates_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let err = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "100".to_string(),
            from: Some("USD".to_string()),
            to: Some("JPY".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.downcast_ref::<FxError>(),
        Some(&FxError::RateUnavailable(code("JPY")))
    );
}

#[test_log::test(tokio::test)]
async fn test_rate_table_over_http() {
    let mock_server = test_utils::create_rates_server().await;
    let provider = ExchangeRateApiProvider::new(&mock_server.uri(), Duration::from_secs(5));
    let table = RateTable::new(code("USD"), provider);

    table.refresh().await.expect("refresh should succeed");
    let snapshot = table.snapshot();
    assert_eq!(snapshot.rate(&code("PKR")), Some(278.5));
    assert_eq!(snapshot.rate(&code("USD")), Some(1.0));
    assert_eq!(
        snapshot.last_updated().map(|t| t.timestamp()),
        Some(1714521601)
    );

    let request = fxconv::core::ConversionRequest::parse("100", "USD", "PKR").unwrap();
    let result = fxconv::core::convert(&snapshot, &request).unwrap();
    assert_eq!(result.to_string(), "27850.00");
}

#[test_log::test(tokio::test)]
async fn test_failed_refresh_over_http_keeps_snapshot() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(test_utils::USD_RATES))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let provider = ExchangeRateApiProvider::new(&mock_server.uri(), Duration::from_secs(5));
    let table = RateTable::new(code("USD"), provider);

    table.refresh().await.expect("first refresh should succeed");
    let before = table.snapshot();

    let result = table.refresh().await;
    assert!(matches!(result, Err(FxError::FetchFailed(_))));
    assert_eq!(*table.snapshot(), *before);
    let error = table.last_error().expect("error state should be observable");
    info!(%error, "Observed refresh error");
    assert!(error.to_string().contains("Failed to parse JSON response for USD"));
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live exchange rate API"]
async fn test_real_exchangerate_api() {
    let provider = ExchangeRateApiProvider::new(
        "https://api.exchangerate-api.com",
        Duration::from_secs(10),
    );
    let base = code("USD");
    info!(%base, "Fetching rates from exchangerate-api");

    match provider.fetch_rates(&base).await {
        Ok(fetched) => {
            info!(count = fetched.rates.len(), "Received rates");
            for common in CurrencyCode::common() {
                let rate = fetched.rates.get(&common);
                assert!(
                    rate.is_some_and(|r| *r > 0.0),
                    "Expected a positive rate for {common}"
                );
            }
        }
        Err(e) => {
            error!("Rates API request failed: {e}\n{e:?}");
            panic!("Rates API request failed: {e}");
        }
    }
}
