//! Currency conversion abstractions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::ProviderError;

pub const DEFAULT_FROM: &str = "USD";
pub const DEFAULT_TO: &str = "INR";
pub const DEFAULT_AMOUNT: f64 = 1.0;

/// Rates for every known currency, relative to one unit of a base currency.
///
/// A table is immutable once built; refreshing a base currency produces a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: Arc<HashMap<String, f64>>,
}

impl RateTable {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self {
            rates: Arc::new(rates),
        }
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Source of live rate tables for a base currency.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, ProviderError>;
}

/// Raw conversion input as supplied by a caller. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversionRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
}

impl ConversionRequest {
    pub fn new(from: &str, to: &str, amount: f64) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            amount: Some(amount.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub converted: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table_lookup() {
        let table: RateTable = [("USD", 1.0), ("INR", 83.0)].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("INR"), Some(83.0));
        assert_eq!(table.get("inr"), None);
        assert!(RateTable::default().is_empty());
    }

    #[test]
    fn test_rate_table_clones_share_rates() {
        let table: RateTable = [("EUR", 0.92)].into_iter().collect();
        let clone = table.clone();
        assert!(Arc::ptr_eq(&table.rates, &clone.rates));
    }
}
