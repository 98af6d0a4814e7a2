//! Single-request provider client with status classification.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::errors::MarketDataError;
use crate::http::{HttpRequest, HttpTransport, TransportError};

/// Successful (2xx) response, body still unparsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Headers every marketplace request carries.
pub fn default_headers(config: &FetchConfig) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("user-agent".to_string(), config.user_agent.clone());
    headers.insert("accept".to_string(), "application/json".to_string());
    headers.insert("cache-control".to_string(), "no-cache".to_string());
    headers
}

/// Issues exactly one request per call and classifies the outcome.
#[derive(Clone)]
pub struct ProviderClient {
    provider: &'static str,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl ProviderClient {
    pub fn new(provider: &'static str, transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self {
            provider,
            transport,
            timeout,
        }
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// GET `url` with `headers`, bounded by the configured timeout.
    ///
    /// Non-2xx statuses and transport failures come back as the matching
    /// [`MarketDataError`] variant, tagged with `item`.
    pub async fn fetch(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        item: &str,
    ) -> Result<RawResponse, MarketDataError> {
        let request = HttpRequest::get(url)
            .with_headers(headers)
            .with_timeout(self.timeout);

        debug!("{} request: {}", self.provider, url);

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} transport failure for {}: {}", self.provider, url, e);
                return Err(self.transport_error(e, item));
            }
        };

        if let Some(error) = self.classify_status(response.status, item) {
            warn!(
                "{} returned HTTP {} for {} ({})",
                self.provider, response.status, url, error
            );
            return Err(error);
        }

        Ok(RawResponse {
            url: url.to_string(),
            status: response.status,
            body: response.body,
        })
    }

    /// Map a non-2xx status to its error class; `None` for success.
    pub fn classify_status(&self, status: u16, item: &str) -> Option<MarketDataError> {
        let provider = self.provider.to_string();
        let item = item.to_string();

        match status {
            200..=299 => None,
            429 => Some(MarketDataError::RateLimited { provider, item }),
            404 => Some(MarketDataError::NotFound { provider, item }),
            500.. => Some(MarketDataError::ServerUnavailable {
                provider,
                item,
                status,
            }),
            _ => Some(MarketDataError::ProtocolError {
                provider,
                item,
                status,
            }),
        }
    }

    fn transport_error(&self, error: TransportError, item: &str) -> MarketDataError {
        match error {
            TransportError::Timeout(_) => MarketDataError::Timeout {
                provider: self.provider.to_string(),
                item: item.to_string(),
            },
            TransportError::Connect(message) | TransportError::Other(message) => {
                MarketDataError::Network {
                    provider: self.provider.to_string(),
                    item: item.to_string(),
                    message,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, StubTransport};

    fn client(stub: StubTransport) -> (ProviderClient, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        let client = ProviderClient::new("STEAM", stub.clone(), Duration::from_secs(5));
        (client, stub)
    }

    async fn fetch_error(stub: StubTransport) -> MarketDataError {
        let (client, _) = client(stub);
        client
            .fetch("https://example.test/history", &BTreeMap::new(), "item")
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_status_classification() {
        assert!(matches!(
            fetch_error(StubTransport::status(429, "")).await,
            MarketDataError::RateLimited { .. }
        ));
        assert!(matches!(
            fetch_error(StubTransport::status(404, "")).await,
            MarketDataError::NotFound { .. }
        ));
        assert!(matches!(
            fetch_error(StubTransport::status(503, "")).await,
            MarketDataError::ServerUnavailable { status: 503, .. }
        ));
        assert!(matches!(
            fetch_error(StubTransport::status(403, "")).await,
            MarketDataError::ProtocolError { status: 403, .. }
        ));
    }

    #[tokio::test]
    async fn test_transport_failures() {
        assert!(matches!(
            fetch_error(StubTransport::timeout()).await,
            MarketDataError::Timeout { .. }
        ));
        assert!(matches!(
            fetch_error(StubTransport::always(Err(TransportError::Connect(
                "refused".to_string()
            ))))
            .await,
            MarketDataError::Network { .. }
        ));
    }

    #[tokio::test]
    async fn test_success_passes_body_and_headers() {
        let (client, stub) = client(StubTransport::always(Ok(HttpResponse::ok("not json"))));
        let headers = default_headers(&FetchConfig::default());

        let raw = client
            .fetch("https://example.test/history", &headers, "item")
            .await
            .unwrap();

        assert_eq!(raw.body, "not json");
        let sent = &stub.requests()[0];
        assert_eq!(sent.header("accept"), Some("application/json"));
        assert_eq!(sent.header("cache-control"), Some("no-cache"));
        assert!(sent.header("user-agent").unwrap().starts_with("Mozilla/5.0"));
        assert_eq!(sent.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_errors_carry_item() {
        let (client, _) = client(StubTransport::default());
        match client.classify_status(404, "AK-47 | Redline (Field-Tested)") {
            Some(MarketDataError::NotFound { item, provider }) => {
                assert_eq!(item, "AK-47 | Redline (Field-Tested)");
                assert_eq!(provider, "STEAM");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
