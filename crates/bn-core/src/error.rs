use std::sync::Arc;
use std::time::Duration;

use bitcoin::Txid;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("failed to decode `{method}` result: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("call to `{method}` was cancelled")]
    Cancelled { method: String },

    #[error("call to `{method}` timed out after {timeout:?}")]
    TimedOut { method: String, timeout: Duration },

    #[error("transaction not found: {0}")]
    TxNotFound(Txid),

    #[error("invalid node data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// The remote error code when the node itself rejected the call.
    pub fn server_code(&self) -> Option<i64> {
        match self {
            Self::Rpc(RpcError::ServerError { code, .. }) => Some(*code),
            _ => None,
        }
    }
}

/// Failure of the shared round trip. Every caller coalesced onto one call
/// observes the same `RpcError`, so it must be cheap to clone.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RpcError {
    #[error("RPC transport failure: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    #[error("RPC endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("invalid JSON-RPC response: {0}")]
    InvalidResponse(String),

    #[error("RPC server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("in-flight RPC call was abandoned before it completed")]
    Aborted,
}

impl RpcError {
    /// True when the round trip succeeded but the node reported a failure.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::ServerError { .. })
    }

    /// True for connectivity, HTTP framing and envelope failures.
    pub fn is_transport(&self) -> bool {
        !self.is_protocol()
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_is_protocol_class() {
        let err = RpcError::ServerError {
            code: -8,
            message: "Block height out of range".into(),
        };
        assert!(err.is_protocol());
        assert!(!err.is_transport());
        assert_eq!(CoreError::from(err).server_code(), Some(-8));
    }

    #[test]
    fn envelope_failures_are_transport_class() {
        assert!(RpcError::InvalidResponse("bad".into()).is_transport());
        assert!(RpcError::Aborted.is_transport());
        assert!(RpcError::HttpStatus {
            status: 401,
            body: String::new()
        }
        .is_transport());
    }

    #[test]
    fn rpc_error_display_is_transparent() {
        let err = CoreError::from(RpcError::ServerError {
            code: -5,
            message: "No such mempool or blockchain transaction".into(),
        });
        assert_eq!(
            err.to_string(),
            "RPC server error -5: No such mempool or blockchain transaction"
        );
    }
}
