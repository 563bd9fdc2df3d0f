use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyCode;
use crate::core::rates::{FetchedRates, RateProvider};

// ExchangeRateApiProvider implementation for RateProvider
pub struct ExchangeRateApiProvider {
    base_url: String,
    timeout: Duration,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    base: Option<String>,
    rates: HashMap<String, f64>,
    time_last_updated: Option<i64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<FetchedRates> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxconv/1.0")
            .timeout(self.timeout)
            .build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        if let Some(reported) = data.base.as_deref() {
            if !reported.eq_ignore_ascii_case(base.as_str()) {
                return Err(anyhow!(
                    "Provider returned rates for {} instead of {}",
                    reported,
                    base
                ));
            }
        }

        let mut rates = HashMap::with_capacity(data.rates.len());
        for (code, rate) in data.rates {
            match code.parse::<CurrencyCode>() {
                Ok(code) => {
                    rates.insert(code, rate);
                }
                Err(_) => debug!("Skipping unrecognised currency code: {}", code),
            }
        }

        let last_updated = data
            .time_last_updated
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

        debug!(count = rates.len(), "Received exchange rates");
        Ok(FetchedRates {
            rates,
            last_updated,
        })
    }
}
