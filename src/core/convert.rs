//! Cross-rate conversion over a rate snapshot

use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use crate::core::rates::RateSnapshot;
use std::fmt::Display;

/// A single conversion to perform. Built once per user action.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    amount: f64,
    source: CurrencyCode,
    target: CurrencyCode,
}

impl ConversionRequest {
    /// Amount must be finite and non-negative.
    pub fn new(amount: f64, source: CurrencyCode, target: CurrencyCode) -> Result<Self, FxError> {
        if !amount.is_finite() {
            return Err(FxError::InvalidAmount(format!("{amount} is not a finite number")));
        }
        if amount < 0.0 {
            return Err(FxError::InvalidAmount(format!("{amount} is negative")));
        }
        Ok(Self {
            amount,
            source,
            target,
        })
    }

    /// Builds a request from raw user input.
    pub fn parse(amount: &str, source: &str, target: &str) -> Result<Self, FxError> {
        let trimmed = amount.trim();
        if trimmed.is_empty() {
            return Err(FxError::InvalidAmount("amount is missing".to_string()));
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| FxError::InvalidAmount(format!("'{trimmed}' is not a number")))?;
        Self::new(value, source.parse()?, target.parse()?)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn source(&self) -> &CurrencyCode {
        &self.source
    }

    pub fn target(&self) -> &CurrencyCode {
        &self.target
    }
}

/// Outcome of a successful conversion. `value` keeps full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub request: ConversionRequest,
    pub rate: f64,
    pub value: f64,
}

impl Conversion {
    pub fn rounded(&self) -> f64 {
        round_to_cents(self.value)
    }
}

impl Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

/// Magnitude above which an f64 carries no fractional cents.
const WHOLE_CENTS_LIMIT: f64 = 1e15;

/// Rounds half away from zero to 2 decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= WHOLE_CENTS_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}

fn checked_result(value: f64, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, FxError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FxError::OutOfRange {
            from: from.clone(),
            to: to.clone(),
        })
    }
}

fn checked_rate(snapshot: &RateSnapshot, code: &CurrencyCode) -> Result<f64, FxError> {
    let rate = snapshot
        .rate(code)
        .ok_or_else(|| FxError::RateUnavailable(code.clone()))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(FxError::InvalidRate {
            currency: code.clone(),
            rate,
        })
    }
}

impl RateSnapshot {
    /// Rate to multiply a `source` amount by to get `target`, derived via
    /// the base currency.
    pub fn cross_rate(&self, source: &CurrencyCode, target: &CurrencyCode) -> Result<f64, FxError> {
        if source == target {
            return Ok(1.0);
        }
        let source_rate = checked_rate(self, source)?;
        let target_rate = checked_rate(self, target)?;
        checked_result(target_rate / source_rate, source, target)
    }
}

/// Converts the requested amount using `snapshot`.
///
/// Same-currency requests succeed even when the snapshot is empty.
pub fn convert(snapshot: &RateSnapshot, request: &ConversionRequest) -> Result<Conversion, FxError> {
    if request.source == request.target {
        return Ok(Conversion {
            request: request.clone(),
            rate: 1.0,
            value: request.amount,
        });
    }

    let source_rate = checked_rate(snapshot, &request.source)?;
    let target_rate = checked_rate(snapshot, &request.target)?;
    let (source, target) = (&request.source, &request.target);
    let rate = checked_result(target_rate / source_rate, source, target)?;
    // Multiply first so a base-currency source is exact.
    let value = checked_result(request.amount * target_rate / source_rate, source, target)?;

    Ok(Conversion {
        request: request.clone(),
        rate,
        value,
    })
}
