//! Currency conversion on top of cached provider rates

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::core::cache::{CacheLookup, RateCache};
use crate::core::currency::{
    ConversionRequest, ConversionResult, DEFAULT_AMOUNT, DEFAULT_FROM, DEFAULT_TO, RateProvider,
    RateTable,
};
use crate::core::error::ConversionError;

pub struct ConversionService {
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
    // One lock per base currency so concurrent misses share a single provider call.
    fetch_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversionService {
    pub fn new(provider: Arc<dyn RateProvider>, cache: RateCache) -> Self {
        Self {
            provider,
            cache,
            fetch_locks: Mutex::new(HashMap::new()),
        }
    }

    #[instrument(name = "Convert", skip(self))]
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let from = normalize_code(request.from.as_deref(), DEFAULT_FROM);
        let to = normalize_code(request.to.as_deref(), DEFAULT_TO);
        let amount = parse_amount(request.amount.as_deref());

        let rates = self.rates_for(&from).await?;
        let rate = rates
            .get(&to)
            .ok_or_else(|| ConversionError::UnknownCurrency(to.clone()))?;

        let converted = amount * rate;
        if !converted.is_finite() {
            return Err(ConversionError::OutOfRange { amount, rate });
        }
        debug!("Converted {} {} to {} {} at {}", amount, from, converted, to, rate);

        Ok(ConversionResult {
            from,
            to,
            amount,
            rate,
            converted,
        })
    }

    /// Returns a fresh rate table for `base`, calling the provider at most once on a miss.
    pub async fn rates_for(&self, base: &str) -> Result<RateTable, ConversionError> {
        if let CacheLookup::Fresh(table) = self.cache.lookup(base).await {
            return Ok(table);
        }

        let lock = {
            let mut locks = self.fetch_locks.lock().await;
            Arc::clone(locks.entry(base.to_string()).or_default())
        };
        let _guard = lock.lock().await;

        // Another request may have refreshed the entry while we waited.
        match self.cache.lookup(base).await {
            CacheLookup::Fresh(table) => return Ok(table),
            CacheLookup::Stale(previous) => {
                debug!("Refreshing {} stale rates for {}", previous.len(), base)
            }
            CacheLookup::Missing => {}
        }

        let table = self.provider.fetch_rates(base).await?;
        if table.is_empty() {
            warn!("Provider returned no rates for {}", base);
        }
        self.cache.put(base, table.clone()).await;
        Ok(table)
    }
}

/// Uppercases a supplied code as-is; only an absent code takes the default.
fn normalize_code(code: Option<&str>, default: &str) -> String {
    code.unwrap_or(default).to_uppercase()
}

/// Unparsable amounts fall back to the default rather than failing the request.
fn parse_amount(amount: Option<&str>) -> f64 {
    amount
        .and_then(|a| a.trim().parse::<f64>().ok())
        .unwrap_or(DEFAULT_AMOUNT)
}
