use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::RpcConfig;
use crate::error::CoreError;

use super::coalescer::{Acquired, Coalescer, Outcome};
use super::http_transport::HttpTransport;
use super::key::RequestKey;
use super::Transport;

/// Coalescing front door for every RPC issued by this crate.
///
/// Identical `(method, params)` calls that overlap in time share one
/// [`Transport`] round trip. Each caller then decodes the shared raw result
/// into its own output type, so a decode failure for one caller never
/// affects another.
///
/// The round trip runs on a spawned task, detached from whichever caller
/// started it: cancelling or dropping any caller (the first one included)
/// only ends that caller's wait, and the call still completes for the rest.
///
/// Cloning is cheap and clones share the in-flight table. Separate
/// `Dispatcher::new` instances never coalesce with each other.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    coalescer: Arc<Coalescer>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            coalescer: Arc::new(Coalescer::new()),
        }
    }

    /// Build a dispatcher over the HTTP transport for `config`.
    pub fn connect(config: RpcConfig) -> Result<Self, CoreError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Number of distinct calls currently on the wire.
    pub fn in_flight(&self) -> usize {
        self.coalescer.in_flight()
    }

    /// Issue `method` with `params` and decode the result as `T`.
    pub async fn call<T>(&self, method: &str, params: Vec<Value>) -> Result<T, CoreError>
    where
        T: DeserializeOwned,
    {
        let outcome = self.dispatch(method, params).await;
        decode(method, &outcome)
    }

    /// Issue `method` for its side effect only; the result is not decoded.
    pub async fn execute(&self, method: &str, params: Vec<Value>) -> Result<(), CoreError> {
        match self.dispatch(method, params).await.as_ref() {
            Ok(_) => Ok(()),
            Err(err) => Err(err.clone().into()),
        }
    }

    /// Like [`call`](Self::call), but gives up with [`CoreError::Cancelled`]
    /// as soon as `cancel` completes. Only this caller stops waiting.
    pub async fn call_until<T, C>(
        &self,
        cancel: C,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, CoreError>
    where
        T: DeserializeOwned,
        C: Future<Output = ()>,
    {
        // Polling `cancel` first means an already-cancelled caller never
        // registers, so it cannot start a round trip nobody waits for.
        tokio::select! {
            biased;
            () = cancel => Err(CoreError::Cancelled { method: method.to_owned() }),
            result = self.call(method, params) => result,
        }
    }

    /// Like [`call`](Self::call), with a per-caller deadline.
    pub async fn call_timeout<T>(
        &self,
        timeout: Duration,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, CoreError>
    where
        T: DeserializeOwned,
    {
        tokio::time::timeout(timeout, self.call(method, params))
            .await
            .unwrap_or_else(|_| {
                Err(CoreError::TimedOut {
                    method: method.to_owned(),
                    timeout,
                })
            })
    }

    async fn dispatch(&self, method: &str, params: Vec<Value>) -> Arc<Outcome> {
        let key = RequestKey::new(method, &params);
        let pending = match self.coalescer.acquire(key) {
            Acquired::Owner(pending, publisher) => {
                // Params may carry passphrases or private keys; never log them.
                debug!(rpc.method = method, rpc.params = params.len(), "rpc dispatch");
                let transport = Arc::clone(&self.transport);
                let method = method.to_owned();
                // Spawned before this caller's first await, so the round trip
                // proceeds even if the caller is cancelled right away.
                tokio::spawn(async move {
                    let outcome = transport.send(&method, params).await;
                    publisher.publish(outcome);
                });
                pending
            }
            Acquired::Waiter(pending) => {
                trace!(rpc.method = method, "joined in-flight rpc call");
                pending
            }
        };
        pending.wait().await
    }
}

fn decode<T>(method: &str, outcome: &Outcome) -> Result<T, CoreError>
where
    T: DeserializeOwned,
{
    let value = outcome.as_ref().map_err(|err| CoreError::Rpc(err.clone()))?;
    T::deserialize(value).map_err(|source| CoreError::Decode {
        method: method.to_owned(),
        source,
    })
}
