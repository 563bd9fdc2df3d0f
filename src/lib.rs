pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ConversionRequest, CurrencyCode, RateTable};
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Rates {
        currencies: Vec<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let api = &config.providers.exchangerate_api;
    let provider = providers::ExchangeRateApiProvider::new(
        &api.base_url,
        Duration::from_secs(api.timeout_secs),
    );
    let table = RateTable::new(config.base_currency.clone(), provider);

    match command {
        AppCommand::Convert { amount, from, to } => {
            let from = from.as_deref().unwrap_or(config.default_from.as_str());
            let to = to.as_deref().unwrap_or(config.default_to.as_str());
            let request = ConversionRequest::parse(&amount, from, to)?;
            cli::convert::run(&table, &request).await
        }
        AppCommand::Rates { currencies } => {
            let currencies = currencies
                .iter()
                .map(|c| c.parse::<CurrencyCode>())
                .collect::<Result<Vec<_>, _>>()?;
            cli::rates::run(&table, &currencies).await
        }
    }
}
