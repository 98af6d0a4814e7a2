//! Retry cascade for providers without a stable endpoint.
//!
//! A cascade walks an ordered list of [`AttemptVariant`]s strictly in
//! sequence:
//!
//! ```text
//! Pending(0) --fail--> Pending(1) --fail--> ... --fail--> Exhausted
//!     |                    |
//!     +--ok--> Succeeded   +--ok--> Succeeded
//! ```
//!
//! Bodies are read as text and parsed afterwards. A body that is not JSON is
//! recorded and the cascade moves on, since some variants probe different
//! content negotiation.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::diagnostics::{AttemptOutcome, FetchDiagnostics, ProviderAttempt};
use crate::errors::{MarketDataError, RetryClass};
use crate::provider::client::ProviderClient;

/// One way of asking the provider for the same data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptVariant {
    pub name: &'static str,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

impl AttemptVariant {
    pub fn new(
        name: &'static str,
        url: impl Into<String>,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name,
            url: url.into(),
            headers,
        }
    }
}

/// Where in the decoded body the payload array was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchedKey {
    /// The literal `data` key
    Data,
    /// The body itself
    Root,
    /// Any other array-valued property, as a dotted path
    Property(String),
}

impl fmt::Display for MatchedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => f.write_str("data"),
            Self::Root => f.write_str("root"),
            Self::Property(path) => f.write_str(path),
        }
    }
}

/// Cascade state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum CascadeState {
    Pending(usize),
    Succeeded {
        index: usize,
        matched: MatchedKey,
        data: Vec<Value>,
    },
    Exhausted,
}

/// Terminal result of a cascade.
#[derive(Clone, Debug)]
pub enum CascadeOutcome {
    Succeeded {
        variant: &'static str,
        matched: MatchedKey,
        data: Vec<Value>,
        diagnostics: FetchDiagnostics,
    },
    Exhausted {
        last_error: MarketDataError,
        diagnostics: FetchDiagnostics,
    },
}

impl CascadeOutcome {
    pub fn diagnostics(&self) -> &FetchDiagnostics {
        match self {
            Self::Succeeded { diagnostics, .. } | Self::Exhausted { diagnostics, .. } => {
                diagnostics
            }
        }
    }
}

/// Find the first non-empty array in a decoded body.
///
/// Search order: the `data` key, the root itself, properties of an object
/// under `data`, then root properties. Object keys are visited in the order
/// the provider declared them.
pub fn find_array(value: &Value) -> Option<(MatchedKey, &Vec<Value>)> {
    if let Some(array) = value
        .get("data")
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
    {
        return Some((MatchedKey::Data, array));
    }

    if let Some(array) = value.as_array().filter(|a| !a.is_empty()) {
        return Some((MatchedKey::Root, array));
    }

    if let Some(Value::Object(data)) = value.get("data") {
        for (key, v) in data {
            if let Some(array) = v.as_array().filter(|a| !a.is_empty()) {
                return Some((MatchedKey::Property(format!("data.{}", key)), array));
            }
        }
    }

    if let Value::Object(map) = value {
        for (key, v) in map {
            if key == "data" {
                continue;
            }
            if let Some(array) = v.as_array().filter(|a| !a.is_empty()) {
                return Some((MatchedKey::Property(key.clone()), array));
            }
        }
    }

    None
}

/// Runs attempt variants against one provider until one yields data.
#[derive(Clone)]
pub struct RetryCascade {
    client: ProviderClient,
    pause: Duration,
}

impl RetryCascade {
    /// `pause` is slept after a transient failure when another variant remains.
    pub fn new(client: ProviderClient, pause: Duration) -> Self {
        Self { client, pause }
    }

    pub async fn run(&self, item: &str, variants: &[AttemptVariant]) -> CascadeOutcome {
        let mut diagnostics = FetchDiagnostics::new();
        let mut last_error: Option<MarketDataError> = None;
        let mut state = CascadeState::Pending(0);

        loop {
            let index = match &state {
                CascadeState::Pending(index) => *index,
                _ => break,
            };

            let Some(variant) = variants.get(index) else {
                state = CascadeState::Exhausted;
                continue;
            };

            match self.attempt(variant, item).await {
                Ok((matched, data)) => {
                    diagnostics.record(ProviderAttempt {
                        name: variant.name,
                        url: variant.url.clone(),
                        headers: variant.headers.clone(),
                        outcome: AttemptOutcome::Success {
                            matched_key: matched.to_string(),
                            len: data.len(),
                        },
                    });
                    state = CascadeState::Succeeded {
                        index,
                        matched,
                        data,
                    };
                }
                Err((outcome, error)) => {
                    warn!(
                        "{} variant '{}' failed for {} (url: {}, status: {:?}): {}",
                        self.client.provider(),
                        variant.name,
                        item,
                        variant.url,
                        error.status(),
                        error
                    );

                    let backoff = error.retry_class() == RetryClass::WithBackoff;
                    diagnostics.record(ProviderAttempt {
                        name: variant.name,
                        url: variant.url.clone(),
                        headers: variant.headers.clone(),
                        outcome,
                    });
                    last_error = Some(error);

                    if backoff && index + 1 < variants.len() && !self.pause.is_zero() {
                        tokio::time::sleep(self.pause).await;
                    }
                    state = CascadeState::Pending(index + 1);
                }
            }
        }

        match state {
            CascadeState::Succeeded {
                index,
                matched,
                data,
            } => {
                let variant = variants[index].name;
                info!(
                    "{} variant '{}' succeeded for {} after {} attempt(s)",
                    self.client.provider(),
                    variant,
                    item,
                    diagnostics.len()
                );
                debug!("{} payload matched key '{}'", self.client.provider(), matched);
                CascadeOutcome::Succeeded {
                    variant,
                    matched,
                    data,
                    diagnostics,
                }
            }
            _ => {
                let last_error = last_error.unwrap_or_else(|| MarketDataError::CascadeExhausted {
                    provider: self.client.provider().to_string(),
                    item: item.to_string(),
                    attempts: 0,
                });
                warn!(
                    "{} cascade exhausted for {}: {}",
                    self.client.provider(),
                    item,
                    diagnostics.summary()
                );
                CascadeOutcome::Exhausted {
                    last_error,
                    diagnostics,
                }
            }
        }
    }

    async fn attempt(
        &self,
        variant: &AttemptVariant,
        item: &str,
    ) -> Result<(MatchedKey, Vec<Value>), (AttemptOutcome, MarketDataError)> {
        let raw = self
            .client
            .fetch(&variant.url, &variant.headers, item)
            .await
            .map_err(|e| (AttemptOutcome::Failed(e.clone()), e))?;

        let value: Value = serde_json::from_str(&raw.body).map_err(|e| {
            let message = e.to_string();
            let error = MarketDataError::MalformedResponse {
                provider: self.client.provider().to_string(),
                item: item.to_string(),
                message: format!("variant '{}' body is not JSON: {}", variant.name, message),
            };
            (AttemptOutcome::ParseFailed { message }, error)
        })?;

        match find_array(&value) {
            Some((matched, array)) => Ok((matched, array.clone())),
            None => {
                let error = if value.is_array() || value.get("data").is_some_and(Value::is_array) {
                    MarketDataError::EmptyResult {
                        provider: self.client.provider().to_string(),
                        item: item.to_string(),
                    }
                } else {
                    MarketDataError::UnexpectedShape {
                        provider: self.client.provider().to_string(),
                        item: item.to_string(),
                    }
                };
                Err((AttemptOutcome::Failed(error.clone()), error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, StubTransport, TransportError};
    use serde_json::json;
    use std::sync::Arc;

    fn cascade(stub: StubTransport) -> (RetryCascade, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        let client = ProviderClient::new("BUFF163", stub.clone(), Duration::from_secs(1));
        (RetryCascade::new(client, Duration::ZERO), stub)
    }

    fn variants(n: usize) -> Vec<AttemptVariant> {
        const NAMES: [&str; 4] = ["v1", "v2", "v3", "v4"];
        (0..n)
            .map(|i| {
                AttemptVariant::new(NAMES[i], format!("https://buff.test/{}", i), BTreeMap::new())
            })
            .collect()
    }

    #[test]
    fn test_find_array_prefers_data() {
        let value = json!({"items": [1], "data": [2, 3]});
        let (key, array) = find_array(&value).unwrap();
        assert_eq!(key, MatchedKey::Data);
        assert_eq!(array.len(), 2);
    }

    #[test]
    fn test_find_array_root() {
        let value = json!([[1714521600000_i64, 12.5]]);
        let (key, _) = find_array(&value).unwrap();
        assert_eq!(key, MatchedKey::Root);
    }

    #[test]
    fn test_find_array_declared_key_order() {
        let value = json!({"code": "OK", "data": {"currency": "CNY", "price_history": [[1, 2]], "other": [[3]]}});
        let (key, _) = find_array(&value).unwrap();
        assert_eq!(key, MatchedKey::Property("data.price_history".to_string()));

        let value = json!({"empty": [], "prices": [1], "volumes": [2]});
        let (key, array) = find_array(&value).unwrap();
        assert_eq!(key, MatchedKey::Property("prices".to_string()));
        assert_eq!(array, &vec![json!(1)]);
    }

    #[test]
    fn test_find_array_none() {
        assert!(find_array(&json!({"data": []})).is_none());
        assert!(find_array(&json!({"code": "OK"})).is_none());
        assert!(find_array(&json!("text")).is_none());
    }

    #[tokio::test]
    async fn test_last_variant_succeeds_after_non_json() {
        let (cascade, stub) = cascade(StubTransport::sequence(vec![
            Ok(HttpResponse::ok("<html>login</html>")),
            Ok(HttpResponse::ok("not json either")),
            Ok(HttpResponse::ok(r#"{"data":[[1714521600000,12.5]]}"#)),
        ]));

        let outcome = cascade.run("42567", &variants(3)).await;

        match outcome {
            CascadeOutcome::Succeeded {
                variant,
                matched,
                data,
                diagnostics,
            } => {
                assert_eq!(variant, "v3");
                assert_eq!(matched, MatchedKey::Data);
                assert_eq!(data.len(), 1);
                assert_eq!(diagnostics.len(), 3);
                assert_eq!(diagnostics.errors().len(), 2);
                assert!(matches!(
                    diagnostics.attempts[0].outcome,
                    AttemptOutcome::ParseFailed { .. }
                ));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(stub.request_count(), 3);
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let (cascade, stub) = cascade(StubTransport::always(Ok(HttpResponse::ok(
            r#"[[1714521600000,12.5]]"#,
        ))));

        let outcome = cascade.run("42567", &variants(4)).await;
        assert!(matches!(outcome, CascadeOutcome::Succeeded { variant: "v1", .. }));
        assert_eq!(stub.request_count(), 1);
        assert_eq!(stub.requests()[0].url, "https://buff.test/0");
    }

    #[tokio::test]
    async fn test_exhausted_carries_last_error() {
        let (cascade, stub) = cascade(StubTransport::sequence(vec![
            Err(TransportError::Timeout(Duration::from_secs(1))),
            Ok(HttpResponse::new(503, "")),
            Ok(HttpResponse::ok(r#"{"data":[]}"#)),
        ]));

        let outcome = cascade.run("42567", &variants(3)).await;
        match outcome {
            CascadeOutcome::Exhausted {
                last_error,
                diagnostics,
            } => {
                assert!(matches!(last_error, MarketDataError::EmptyResult { .. }));
                assert_eq!(diagnostics.len(), 3);
                assert!(!diagnostics.has_success());
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(stub.request_count(), 3);
    }

    #[tokio::test]
    async fn test_unexpected_shape() {
        let (cascade, _) = cascade(StubTransport::always(Ok(HttpResponse::ok(
            r#"{"code":"Login Required"}"#,
        ))));

        let outcome = cascade.run("42567", &variants(1)).await;
        match outcome {
            CascadeOutcome::Exhausted { last_error, .. } => {
                assert!(matches!(last_error, MarketDataError::UnexpectedShape { .. }));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_variants() {
        let (cascade, stub) = cascade(StubTransport::default());
        let outcome = cascade.run("42567", &[]).await;
        assert!(matches!(
            outcome,
            CascadeOutcome::Exhausted {
                last_error: MarketDataError::CascadeExhausted { attempts: 0, .. },
                ..
            }
        ));
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_after_transient_failure() {
        let stub = Arc::new(StubTransport::sequence(vec![
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::ok(r#"{"data":[1]}"#)),
        ]));
        let client = ProviderClient::new("BUFF163", stub.clone(), Duration::from_secs(1));
        let cascade = RetryCascade::new(client, Duration::from_millis(250));

        let started = tokio::time::Instant::now();
        let outcome = cascade.run("42567", &variants(2)).await;

        assert!(matches!(outcome, CascadeOutcome::Succeeded { variant: "v2", .. }));
        assert!(started.elapsed() >= Duration::from_millis(250));
    }
}
