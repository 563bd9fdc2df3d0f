//! Currency codes

use crate::core::error::FxError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// An ISO-4217 style currency code: three ASCII letters, upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Currencies offered by default in front ends.
    pub const COMMON: [&'static str; 7] = ["USD", "EUR", "GBP", "JPY", "AUD", "CAD", "PKR"];

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn common() -> Vec<CurrencyCode> {
        Self::COMMON
            .iter()
            .map(|code| CurrencyCode(code.to_string()))
            .collect()
    }
}

impl FromStr for CurrencyCode {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code))
        } else {
            Err(FxError::InvalidCurrency(s.to_string()))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
