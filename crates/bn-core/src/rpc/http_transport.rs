//! JSON-RPC over HTTP(S) using `reqwest`, with basic auth and optional
//! request rate limiting.

use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header;
use tracing::{debug, trace};

use crate::config::RpcConfig;
use crate::error::{CoreError, RpcError};

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use super::Transport;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Longest response body echoed back inside an error message.
const ERROR_BODY_PREVIEW: usize = 512;

/// One physical JSON-RPC round trip per [`Transport::send`].
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    auth: Option<(String, String)>,
    client_id: String,
    jsonrpc_version: String,
    limiter: Option<DirectRateLimiter>,
}

impl HttpTransport {
    pub fn new(config: RpcConfig) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(32)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CoreError::InvalidConfig(format!("build HTTP client: {e}")))?;

        let limiter = match config.requests_per_second {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or_else(|| {
                    CoreError::InvalidConfig("requests_per_second must be at least 1".to_owned())
                })?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self {
            client,
            url: config.url,
            auth: config.auth,
            client_id: config.client_id,
            jsonrpc_version: config.jsonrpc_version,
            limiter,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, RpcError> {
        self.wait_for_rate_limit().await;
        debug!(
            rpc.id = %self.client_id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: &self.jsonrpc_version,
            id: &self.client_id,
            method,
            params,
        };

        let mut builder = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&req);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }

        let response = builder.send().await?;
        let status = response.status();

        let body = response.text().await?;
        debug!(rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.method = method, body = %body, "rpc response body");

        // Bitcoin nodes answer RPC-level failures with a 4xx/5xx status and a
        // JSON-RPC envelope, so the body is tried before the status code.
        let decoded: JsonRpcResponse = match serde_json::from_str(&body) {
            Ok(decoded) => decoded,
            Err(_) if !status.is_success() => {
                return Err(RpcError::HttpStatus {
                    status: status.as_u16(),
                    body: preview(&body),
                });
            }
            Err(e) => {
                return Err(RpcError::InvalidResponse(format!(
                    "decode JSON-RPC response: {e}; body={}",
                    preview(&body)
                )));
            }
        };

        decoded.into_outcome(&self.client_id)
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_PREVIEW) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_rate_limit() {
        let config = RpcConfig::new("http://127.0.0.1:8332", None, None, None)
            .expect("config should build")
            .with_rate_limit(0);
        let err = HttpTransport::new(config)
            .err()
            .expect("zero rate limit must be rejected");
        assert!(err.to_string().contains("requests_per_second"));
    }

    #[test]
    fn new_keeps_endpoint() {
        let config = RpcConfig::new("http://127.0.0.1:8332", None, None, None)
            .expect("config should build");
        let transport = HttpTransport::new(config).expect("transport should build");
        assert_eq!(transport.url(), "http://127.0.0.1:8332");
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = "x".repeat(ERROR_BODY_PREVIEW + 10);
        let cut = preview(&long);
        assert_eq!(cut.len(), ERROR_BODY_PREVIEW + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }
}
