pub mod core;
pub mod providers;
pub mod server;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::{API_KEY_ENV, AppConfig};
use crate::core::{ConversionService, RateCache};
use crate::providers::ExchangeRateApiProvider;

pub use crate::core::config;

/// Builds the conversion service with a live provider and an empty cache.
pub fn build_service(config: &AppConfig) -> Result<Arc<ConversionService>> {
    let provider =
        ExchangeRateApiProvider::new(config.exchangerate_base_url(), config.api_key.clone())
            .context("Failed to build HTTP client")?;
    if !config.has_api_key() {
        warn!(
            "No API key configured. Set {} to enable live rates",
            API_KEY_ENV
        );
    }
    Ok(Arc::new(ConversionService::new(
        Arc::new(provider),
        RateCache::new(),
    )))
}

pub async fn run(config: AppConfig) -> Result<()> {
    info!("Currency converter starting...");
    debug!("Loaded config: {:#?}", redacted(&config));

    let service = build_service(&config)?;
    server::serve(&config.server, service).await
}

fn redacted(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    if config.api_key.is_some() {
        config.api_key = Some("***".to_string());
    }
    config
}
