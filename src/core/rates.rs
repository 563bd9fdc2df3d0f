//! Rate table abstractions: the provider seam, immutable snapshots and the
//! refreshable table holding the latest one.

use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Rates as returned by a provider, quoted against the requested base.
#[derive(Debug, Clone, Default)]
pub struct FetchedRates {
    pub rates: HashMap<CurrencyCode, f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<FetchedRates>;
}

/// An immutable copy of the rate mapping at a point in time.
///
/// Every rate is relative to `base`, whose rate is exactly 1.0 even before
/// the first fetch. An empty snapshot means no rates were fetched yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    base: CurrencyCode,
    rates: HashMap<CurrencyCode, f64>,
    fetched_at: Option<DateTime<Utc>>,
    last_updated: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    pub fn empty(base: CurrencyCode) -> Self {
        Self {
            base,
            rates: HashMap::new(),
            fetched_at: None,
            last_updated: None,
        }
    }

    pub fn from_rates(base: CurrencyCode, fetched: FetchedRates) -> Self {
        let mut rates = fetched.rates;
        if let Some(reported) = rates.insert(base.clone(), 1.0) {
            if reported != 1.0 {
                warn!(%base, reported, "Provider reported a non-unit base rate, overriding");
            }
        }
        Self {
            base,
            rates,
            fetched_at: Some(Utc::now()),
            last_updated: fetched.last_updated,
        }
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Rate of `code` against the base. The base itself is always 1.0.
    pub fn rate(&self, code: &CurrencyCode) -> Option<f64> {
        if code == &self.base {
            return Some(1.0);
        }
        self.rates.get(code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Currency codes in the snapshot, sorted.
    pub fn currencies(&self) -> Vec<&CurrencyCode> {
        let mut codes: Vec<_> = self.rates.keys().collect();
        codes.sort();
        codes
    }

    /// When this snapshot was built from a successful fetch.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// When the provider last updated its rates, if it reported it.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

struct TableState {
    snapshot: Arc<RateSnapshot>,
    last_error: Option<FxError>,
}

/// Holds the latest successfully fetched snapshot and the last fetch error.
///
/// Snapshot and error are swapped together under one lock after a fetch
/// completes, so readers never observe a mix of two responses.
pub struct RateTable<P: RateProvider> {
    base: CurrencyCode,
    provider: P,
    state: RwLock<TableState>,
}

impl<P: RateProvider> RateTable<P> {
    pub fn new(base: CurrencyCode, provider: P) -> Self {
        let snapshot = Arc::new(RateSnapshot::empty(base.clone()));
        Self {
            base,
            provider,
            state: RwLock::new(TableState {
                snapshot,
                last_error: None,
            }),
        }
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Fetches rates once and replaces the snapshot on success.
    ///
    /// On failure the previous snapshot is kept and the error is recorded;
    /// it is also returned so callers can branch on it.
    pub async fn refresh(&self) -> Result<(), FxError> {
        debug!(base = %self.base, "Refreshing exchange rates");
        match self.provider.fetch_rates(&self.base).await {
            Ok(fetched) => {
                let snapshot = Arc::new(RateSnapshot::from_rates(self.base.clone(), fetched));
                debug!(count = snapshot.len(), "Replacing rate snapshot");
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                state.snapshot = snapshot;
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                let error = FxError::FetchFailed(format!("{e:#}"));
                warn!(error = %error, "Keeping previous rate snapshot");
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                state.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    pub fn snapshot(&self) -> Arc<RateSnapshot> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state.snapshot)
    }

    pub fn last_error(&self) -> Option<FxError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.last_error.clone()
    }
}
