//! Attempt tracking for retry cascade diagnostics.

use std::collections::BTreeMap;

use crate::errors::MarketDataError;

/// How a single variant ended.
#[derive(Clone, Debug, PartialEq)]
pub enum AttemptOutcome {
    /// The variant yielded a non-empty array under the given key.
    Success { matched_key: String, len: usize },

    /// The body could not be parsed as JSON.
    ParseFailed { message: String },

    /// The request or payload failed with a classified error.
    Failed(MarketDataError),
}

/// Record of one variant of a retry cascade. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderAttempt {
    pub name: &'static str,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub outcome: AttemptOutcome,
}

impl ProviderAttempt {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success { .. })
    }
}

/// Ordered ledger of every variant a cascade tried.
#[derive(Clone, Debug, Default)]
pub struct FetchDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    pub fn record(&mut self, attempt: ProviderAttempt) {
        self.attempts.push(attempt);
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                AttemptOutcome::Success { matched_key, len } => {
                    format!("{}: SUCCESS ({} items under {})", a.name, len, matched_key)
                }
                AttemptOutcome::ParseFailed { message } => {
                    format!("{}: PARSE FAILED ({})", a.name, message)
                }
                AttemptOutcome::Failed(error) => format!("{}: ERROR ({})", a.name, error),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Check if any variant succeeded.
    pub fn has_success(&self) -> bool {
        self.attempts.iter().any(ProviderAttempt::is_success)
    }

    /// Variant names paired with their failure text, in attempt order.
    pub fn errors(&self) -> Vec<(&'static str, String)> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::Success { .. } => None,
                AttemptOutcome::ParseFailed { message } => Some((a.name, message.clone())),
                AttemptOutcome::Failed(error) => Some((a.name, error.to_string())),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}
