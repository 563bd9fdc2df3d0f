//! Core business logic abstractions

pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use convert::{Conversion, ConversionRequest, convert, round_to_cents};
pub use currency::CurrencyCode;
pub use error::FxError;
pub use rates::{FetchedRates, RateProvider, RateSnapshot, RateTable};
