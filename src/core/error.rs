//! Error kinds surfaced by the rate table and the converter

use crate::core::currency::CurrencyCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    #[error("Error fetching exchange rates: {0}")]
    FetchFailed(String),
    #[error("Exchange rate unavailable for {0}")]
    RateUnavailable(CurrencyCode),
    #[error("Invalid exchange rate {rate} for {currency}")]
    InvalidRate { currency: CurrencyCode, rate: f64 },
    #[error("Conversion from {from} to {to} is out of range")]
    OutOfRange { from: CurrencyCode, to: CurrencyCode },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
}
