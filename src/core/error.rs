//! Error taxonomy for rate fetching and conversion

use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("No API key configured. Set EXRATE_API_KEY environment variable.")]
    NoCredential,
    #[error("{message}")]
    FetchFailed {
        message: String,
        details: Option<Value>,
    },
}

impl ProviderError {
    pub fn fetch_failed(message: impl Into<String>, details: impl Display) -> Self {
        ProviderError::FetchFailed {
            message: message.into(),
            details: Some(Value::String(details.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("currency '{0}' not found")]
    UnknownCurrency(String),
    #[error("converted amount is out of range")]
    OutOfRange { amount: f64, rate: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoCredential,
    FetchFailed,
    UnknownCurrency,
    OutOfRange,
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::Provider(ProviderError::NoCredential) => ErrorKind::NoCredential,
            ConversionError::Provider(ProviderError::FetchFailed { .. }) => ErrorKind::FetchFailed,
            ConversionError::UnknownCurrency(_) => ErrorKind::UnknownCurrency,
            ConversionError::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }

    /// Client-side errors are the caller's to fix; everything else is upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnknownCurrency | ErrorKind::OutOfRange
        )
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            ConversionError::Provider(ProviderError::FetchFailed { details, .. }) => {
                details.as_ref()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_and_messages() {
        let err = ConversionError::UnknownCurrency("ZZZ".to_string());
        assert_eq!(err.kind(), ErrorKind::UnknownCurrency);
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "currency 'ZZZ' not found");

        let err = ConversionError::from(ProviderError::NoCredential);
        assert_eq!(err.kind(), ErrorKind::NoCredential);
        assert!(!err.is_client_error());
        assert!(err.details().is_none());

        let err = ConversionError::from(ProviderError::fetch_failed("fetch_failed", "timed out"));
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
        assert_eq!(err.to_string(), "fetch_failed");
        assert_eq!(err.details(), Some(&Value::String("timed out".to_string())));
    }

    #[test]
    fn test_out_of_range_is_client_error() {
        let err = ConversionError::OutOfRange {
            amount: 1e308,
            rate: 83.0,
        };
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "converted amount is out of range");
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NoCredential).unwrap();
        assert_eq!(json, r#""no_credential""#);
    }
}
