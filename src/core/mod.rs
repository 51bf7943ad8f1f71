//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod log;

// Re-export main types for cleaner imports
pub use cache::{CacheLookup, RateCache};
pub use conversion::ConversionService;
pub use currency::{ConversionRequest, ConversionResult, RateProvider, RateTable};
pub use error::{ConversionError, ErrorKind, ProviderError};
