//! JSON-RPC plumbing for talking to a node.
//!
//! [`Dispatcher`] is the single entry point used by every typed operation.
//! It coalesces identical concurrent calls onto one [`Transport`] round trip
//! and decodes the shared result separately for each caller.

mod coalescer;
mod dispatcher;
mod http_transport;
mod key;
#[cfg(test)]
pub(crate) mod mock;
mod protocol;

pub use coalescer::{Acquired, Coalescer, Outcome, PendingOutcome, Publisher};
pub use dispatcher::Dispatcher;
pub use http_transport::HttpTransport;
pub use key::RequestKey;

use async_trait::async_trait;

use crate::error::RpcError;

/// One physical request/response exchange with a node.
///
/// Implementations serialize the request envelope, perform the round trip
/// and classify failures. They never retry and never coalesce; that is the
/// dispatcher's job.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, RpcError>;
}
