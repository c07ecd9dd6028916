use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RpcError;

use super::Transport;

/// An in-memory transport for testing. Counts round trips, records the
/// requests it saw, and answers from canned per-method responses populated
/// via the builder pattern.
pub struct MockTransport {
    responses: HashMap<String, Result<Value, RpcError>>,
    panics: Vec<String>,
    delay: Duration,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            responses: HashMap::new(),
            panics: Vec::new(),
            delay: Duration::from_secs(1),
        }
    }

    /// Total number of physical round trips performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, Vec<Value>)> {
        self.requests
            .lock()
            .expect("mock request log must not be poisoned")
            .clone()
    }

    /// The single request seen so far. Panics if there were zero or several.
    pub fn only_request(&self) -> (String, Vec<Value>) {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
        requests.into_iter().next().expect("length checked above")
    }
}

pub struct MockTransportBuilder {
    responses: HashMap<String, Result<Value, RpcError>>,
    panics: Vec<String>,
    delay: Duration,
}

impl MockTransportBuilder {
    pub fn with_result(mut self, method: &str, result: Value) -> Self {
        self.responses.insert(method.to_owned(), Ok(result));
        self
    }

    pub fn with_error(mut self, method: &str, error: RpcError) -> Self {
        self.responses.insert(method.to_owned(), Err(error));
        self
    }

    pub fn with_panic(mut self, method: &str) -> Self {
        self.panics.push(method.to_owned());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            responses: self.responses,
            panics: self.panics,
            delay: self.delay,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("mock request log must not be poisoned")
            .push((method.to_owned(), params));

        tokio::time::sleep(self.delay).await;

        if self.panics.iter().any(|m| m == method) {
            panic!("mock transport told to panic on `{method}`");
        }
        self.responses
            .get(method)
            .cloned()
            .unwrap_or_else(|| Ok(Value::String("ohiya".into())))
    }
}
