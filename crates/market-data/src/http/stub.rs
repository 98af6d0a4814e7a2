use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};

type Reply = Result<HttpResponse, TransportError>;

/// Offline transport returning canned replies in order.
///
/// Once the queue is down to its last reply, that reply repeats for every
/// further request. Every request is recorded for assertions.
#[derive(Debug, Default)]
pub struct StubTransport {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    /// Replies in the given order.
    pub fn sequence(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// The same reply for every request.
    pub fn always(reply: Reply) -> Self {
        Self::sequence(vec![reply])
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::always(Ok(HttpResponse::new(status, body)))
    }

    pub fn timeout() -> Self {
        Self::always(Err(TransportError::Timeout(
            std::time::Duration::from_millis(1),
        )))
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.seen).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.seen).len()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.seen).push(request);

        let mut replies = lock(&self.replies);
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };

        reply.unwrap_or_else(|| Err(TransportError::Other("no stubbed reply".to_string())))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequence_then_repeat_last() {
        let stub = StubTransport::sequence(vec![
            Ok(HttpResponse::new(500, "")),
            Ok(HttpResponse::ok("[]")),
        ]);

        let first = stub.execute(HttpRequest::get("a")).await.unwrap();
        let second = stub.execute(HttpRequest::get("b")).await.unwrap();
        let third = stub.execute(HttpRequest::get("c")).await.unwrap();

        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);
        assert_eq!(stub.request_count(), 3);
        assert_eq!(stub.requests()[1].url, "b");
    }

    #[tokio::test]
    async fn test_empty_stub_fails() {
        let stub = StubTransport::default();
        assert!(stub.execute(HttpRequest::get("a")).await.is_err());
    }
}
