use crate::error::RpcError;

#[derive(Debug, serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'a str,
    pub(super) id: &'a str,
    pub(super) method: &'a str,
    pub(super) params: Vec<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct JsonRpcResponse {
    #[serde(default)]
    pub(super) id: Option<serde_json::Value>,
    #[serde(default)]
    pub(super) result: Option<serde_json::Value>,
    #[serde(default)]
    pub(super) error: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Turn a decoded envelope into the call outcome.
    ///
    /// A non-null `error` wins over any `result`. A missing or null `result`
    /// becomes `Value::Null` so void methods (`stop`, `ping`) succeed.
    pub(super) fn into_outcome(self, expected_id: &str) -> Result<serde_json::Value, RpcError> {
        if let Some(err) = self.error {
            return Err(parse_jsonrpc_error(err));
        }
        if let Some(id) = &self.id {
            check_response_id(id, expected_id)?;
        }
        Ok(self.result.unwrap_or(serde_json::Value::Null))
    }
}

/// Parse a JSON-RPC error value into a structured `RpcError`.
///
/// JSON-RPC defines errors as `{"code": <int>, "message": <string>}`.
/// If the error value matches that shape, we produce a `ServerError`;
/// otherwise we fall back to `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: serde_json::Value) -> RpcError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<JsonRpcError>(err.clone()) {
        Ok(parsed) => RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => RpcError::InvalidResponse(format!("non-standard JSON-RPC error: {err}")),
    }
}

// Nodes echo the id back either verbatim or, for numeric-looking ids, as a
// number. Null ids are tolerated since some proxies strip them.
fn check_response_id(id: &serde_json::Value, expected: &str) -> Result<(), RpcError> {
    let matches = match id {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s == expected,
        serde_json::Value::Number(n) => n.to_string() == expected,
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(RpcError::InvalidResponse(format!(
            "response id {id} does not match request id `{expected}`"
        )))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(raw: serde_json::Value) -> JsonRpcResponse {
        serde_json::from_value(raw).expect("envelope must decode")
    }

    #[test]
    fn request_serializes_in_wire_shape() {
        let req = JsonRpcRequest {
            jsonrpc: "1.0",
            id: "bn",
            method: "getblockhash",
            params: vec![json!(100)],
        };
        let wire = serde_json::to_value(&req).expect("request must serialize");
        assert_eq!(
            wire,
            json!({"jsonrpc": "1.0", "id": "bn", "method": "getblockhash", "params": [100]})
        );
    }

    #[test]
    fn request_without_params_sends_empty_array() {
        let req = JsonRpcRequest {
            jsonrpc: "1.0",
            id: "bn",
            method: "getinfo",
            params: Vec::new(),
        };
        let wire = serde_json::to_value(&req).expect("request must serialize");
        assert_eq!(wire["params"], json!([]));
    }

    #[test]
    fn parse_standard_error() {
        let err = parse_jsonrpc_error(json!({"code": -32601, "message": "Method not found"}));
        assert!(matches!(
            err,
            RpcError::ServerError { code: -32601, ref message } if message == "Method not found"
        ));
    }

    #[test]
    fn parse_non_standard_error() {
        let err = parse_jsonrpc_error(json!("boom"));
        assert!(matches!(err, RpcError::InvalidResponse(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn outcome_prefers_error_over_result() {
        let resp = envelope(json!({
            "result": "ignored",
            "error": {"code": -8, "message": "Block height out of range"},
            "id": "bn"
        }));
        let err = resp.into_outcome("bn").expect_err("error must win");
        assert!(err.is_protocol());
    }

    #[test]
    fn outcome_null_error_is_success() {
        let resp = envelope(json!({"result": 42, "error": null, "id": "bn"}));
        assert_eq!(resp.into_outcome("bn").expect("should succeed"), json!(42));
    }

    #[test]
    fn outcome_missing_result_is_null() {
        let resp = envelope(json!({"error": null, "id": "bn"}));
        assert_eq!(
            resp.into_outcome("bn").expect("should succeed"),
            serde_json::Value::Null
        );
    }

    #[test]
    fn outcome_rejects_mismatched_id() {
        let resp = envelope(json!({"result": 1, "error": null, "id": "someone-else"}));
        let err = resp.into_outcome("bn").expect_err("id must match");
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn outcome_accepts_numeric_and_missing_ids() {
        let numeric = envelope(json!({"result": 1, "id": 7}));
        assert!(numeric.into_outcome("7").is_ok());
        let missing = envelope(json!({"result": 1}));
        assert!(missing.into_outcome("bn").is_ok());
    }
}
