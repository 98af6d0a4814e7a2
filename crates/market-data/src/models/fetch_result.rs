use serde::Serialize;

use super::types::ProviderId;
use crate::errors::MarketDataError;

/// Why a result was synthesized instead of fetched.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticReason {
    /// Provider whose failure triggered the fallback
    pub provider: ProviderId,

    /// Error variant name, e.g. "Timeout"
    pub error_kind: &'static str,

    /// Display form of the error
    pub message: String,
}

impl SyntheticReason {
    pub fn from_error(provider: ProviderId, error: &MarketDataError) -> Self {
        Self {
            provider,
            error_kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a fetch: genuine market data or fabricated fallback data.
///
/// The variant is the only source of truth for whether prices are real;
/// consumers must check it before treating data as authoritative.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchResult<T> {
    Real { data: T, provider: ProviderId },
    Synthetic { data: T, reason: SyntheticReason },
}

impl<T> FetchResult<T> {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic { .. })
    }

    pub fn data(&self) -> &T {
        match self {
            Self::Real { data, .. } | Self::Synthetic { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Self::Real { data, .. } | Self::Synthetic { data, .. } => data,
        }
    }

    /// Provider that served the data, or whose failure was covered up.
    pub fn provider(&self) -> &ProviderId {
        match self {
            Self::Real { provider, .. } => provider,
            Self::Synthetic { reason, .. } => &reason.provider,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FetchResult<U> {
        match self {
            Self::Real { data, provider } => FetchResult::Real {
                data: f(data),
                provider,
            },
            Self::Synthetic { data, reason } => FetchResult::Synthetic {
                data: f(data),
                reason,
            },
        }
    }
}
