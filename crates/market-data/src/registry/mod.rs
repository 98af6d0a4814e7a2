//! Request orchestration.
//!
//! This module provides:
//! - The retry cascade for providers without a stable endpoint
//! - Per-variant attempt diagnostics
//! - The dispatcher with synthetic fallback

mod cascade;
mod diagnostics;
mod dispatcher;

pub use cascade::{
    find_array, AttemptVariant, CascadeOutcome, CascadeState, MatchedKey, RetryCascade,
};
pub use diagnostics::{AttemptOutcome, FetchDiagnostics, ProviderAttempt};
pub use dispatcher::{Dispatcher, FetchPayload, FetchRequest};
