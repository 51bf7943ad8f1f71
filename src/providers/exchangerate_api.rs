use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::currency::{RateProvider, RateTable};
use crate::core::error::ProviderError;

/// Upper bound for a single provider round trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Rate provider backed by the exchangerate-api.com v6 `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxconvert/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    fn latest_url(&self, api_key: &str, base: &str) -> Result<reqwest::Url, ProviderError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ProviderError::fetch_failed("fetch_failed", e))?;
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::fetch_failed("fetch_failed", "Provider base URL cannot be a base")
            })?
            .pop_if_empty()
            .extend(["v6", api_key, "latest", base]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(default)]
    conversion_rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NoCredential)?;

        let url = self.latest_url(api_key, base)?;
        debug!("Requesting latest rates for {}", base);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::fetch_failed("fetch_failed", e.without_url()))?;

        if !response.status().is_success() {
            return Err(ProviderError::fetch_failed(
                "fetch_failed",
                format!("HTTP error: {} for base currency: {}", response.status(), base),
            ));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::fetch_failed("fetch_failed", e.without_url()))?;

        let data: LatestRatesResponse = serde_json::from_value(payload.clone()).map_err(|e| {
            ProviderError::fetch_failed(
                "fetch_failed",
                format!("Failed to parse JSON response for {base}: {e}"),
            )
        })?;

        if data.result.as_deref() != Some("success") {
            return Err(ProviderError::FetchFailed {
                message: "API returned non-success".to_string(),
                details: Some(payload),
            });
        }

        let rates = data.conversion_rates.unwrap_or_else(|| {
            warn!("Provider reported success without conversion_rates for {}", base);
            HashMap::new()
        });
        debug!("Received {} rates for {}", rates.len(), base);
        Ok(RateTable::new(rates))
    }
}
