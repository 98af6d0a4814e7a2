//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for deciding between propagation, another
//!   cascade variant, or synthetic fallback

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Provider-defect variants carry the provider id and the item or identifier
/// the request was made for, so callers can build their own messages.
/// Each variant is classified into a [`RetryClass`] via
/// [`retry_class`](Self::retry_class).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The caller supplied a malformed request (empty name, bad URL, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider/operation combination is not supported.
    #[error("Unsupported provider: {provider} does not support {operation}")]
    UnsupportedProvider {
        /// The provider that was requested
        provider: String,
        /// The operation or variant that it cannot serve
        operation: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider} ({item})")]
    RateLimited { provider: String, item: String },

    /// The provider does not know the requested item (HTTP 404).
    #[error("Not found: {provider} ({item})")]
    NotFound { provider: String, item: String },

    /// The provider answered with a 5xx status.
    #[error("Server unavailable: {provider} returned {status} ({item})")]
    ServerUnavailable {
        provider: String,
        item: String,
        status: u16,
    },

    /// Any other non-2xx status.
    #[error("Protocol error: {provider} returned {status} ({item})")]
    ProtocolError {
        provider: String,
        item: String,
        status: u16,
    },

    /// The request was aborted client-side after the configured timeout.
    #[error("Timeout: {provider} ({item})")]
    Timeout { provider: String, item: String },

    /// Connection-level failure, no HTTP status was received.
    #[error("Network error: {provider} ({item}) - {message}")]
    Network {
        provider: String,
        item: String,
        message: String,
    },

    /// 2xx response whose body does not parse into the expected envelope.
    #[error("Malformed response: {provider} ({item}) - {message}")]
    MalformedResponse {
        provider: String,
        item: String,
        message: String,
    },

    /// The envelope was valid but carried no data points.
    #[error("Empty result: {provider} ({item})")]
    EmptyResult { provider: String, item: String },

    /// The body parsed as JSON, but neither the root nor `data` holds the expected array.
    #[error("Unexpected response shape: {provider} ({item})")]
    UnexpectedShape { provider: String, item: String },

    /// Every retry cascade variant failed.
    #[error("All {attempts} request variants failed for {provider} ({item})")]
    CascadeExhausted {
        provider: String,
        item: String,
        attempts: usize,
    },
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: caller defect, propagate unchanged
    /// - [`RetryClass::WithBackoff`]: transient, pause before the next variant
    /// - [`RetryClass::NextVariant`]: provider defect, move on immediately
    ///
    /// # Examples
    ///
    /// ```
    /// use floatwatch_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited {
    ///     provider: "STEAM".to_string(),
    ///     item: "AK-47 | Redline (Field-Tested)".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::InvalidInput("empty item name".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::InvalidInput(_) | Self::UnsupportedProvider { .. } => RetryClass::Never,

            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ServerUnavailable { .. }
            | Self::Network { .. } => RetryClass::WithBackoff,

            Self::NotFound { .. }
            | Self::ProtocolError { .. }
            | Self::MalformedResponse { .. }
            | Self::EmptyResult { .. }
            | Self::UnexpectedShape { .. }
            | Self::CascadeExhausted { .. } => RetryClass::NextVariant,
        }
    }

    /// True for errors caused by the request itself rather than the provider.
    pub fn is_caller_defect(&self) -> bool {
        self.retry_class() == RetryClass::Never
    }

    /// HTTP status attached to the error, if the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::ServerUnavailable { status, .. } | Self::ProtocolError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Short machine-readable name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::UnsupportedProvider { .. } => "UnsupportedProvider",
            Self::RateLimited { .. } => "RateLimited",
            Self::NotFound { .. } => "NotFound",
            Self::ServerUnavailable { .. } => "ServerUnavailable",
            Self::ProtocolError { .. } => "ProtocolError",
            Self::Timeout { .. } => "Timeout",
            Self::Network { .. } => "NetworkError",
            Self::MalformedResponse { .. } => "MalformedResponse",
            Self::EmptyResult { .. } => "EmptyResult",
            Self::UnexpectedShape { .. } => "UnexpectedShape",
            Self::CascadeExhausted { .. } => "CascadeExhausted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_error(kind: &str) -> MarketDataError {
        let provider = "STEAM".to_string();
        let item = "AWP | Asiimov (Field-Tested)".to_string();
        match kind {
            "429" => MarketDataError::RateLimited { provider, item },
            "404" => MarketDataError::NotFound { provider, item },
            "503" => MarketDataError::ServerUnavailable {
                provider,
                item,
                status: 503,
            },
            "timeout" => MarketDataError::Timeout { provider, item },
            _ => MarketDataError::MalformedResponse {
                provider,
                item,
                message: "success flag missing".to_string(),
            },
        }
    }

    #[test]
    fn test_invalid_input_never_retries() {
        let error = MarketDataError::InvalidInput("empty".to_string());
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(error.is_caller_defect());
    }

    #[test]
    fn test_unsupported_provider_never_retries() {
        let error = MarketDataError::UnsupportedProvider {
            provider: "STEAM".to_string(),
            operation: "doppler paint_index".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(error.is_caller_defect());
    }

    #[test]
    fn test_transient_errors_retry_with_backoff() {
        assert_eq!(provider_error("429").retry_class(), RetryClass::WithBackoff);
        assert_eq!(provider_error("503").retry_class(), RetryClass::WithBackoff);
        assert_eq!(
            provider_error("timeout").retry_class(),
            RetryClass::WithBackoff
        );
    }

    #[test]
    fn test_provider_defects_move_to_next_variant() {
        assert_eq!(provider_error("404").retry_class(), RetryClass::NextVariant);
        assert_eq!(
            provider_error("malformed").retry_class(),
            RetryClass::NextVariant
        );
        assert!(!provider_error("404").is_caller_defect());
    }

    #[test]
    fn test_status_is_reported_for_http_failures() {
        assert_eq!(provider_error("429").status(), Some(429));
        assert_eq!(provider_error("404").status(), Some(404));
        assert_eq!(provider_error("503").status(), Some(503));
        assert_eq!(provider_error("timeout").status(), None);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::NotFound {
            provider: "CSFLOAT".to_string(),
            item: "M4A4 | Howl (Minimal Wear)".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Not found: CSFLOAT (M4A4 | Howl (Minimal Wear))"
        );

        let error = MarketDataError::ServerUnavailable {
            provider: "BUFF163".to_string(),
            item: "42567".to_string(),
            status: 502,
        };
        assert_eq!(
            format!("{}", error),
            "Server unavailable: BUFF163 returned 502 (42567)"
        );
    }
}
