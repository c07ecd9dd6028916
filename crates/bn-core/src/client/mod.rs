//! Typed node operations.
//!
//! Every method is a method name, an ordered parameter list and a result
//! type, all funnelled through one [`Dispatcher`]. Operations are grouped by
//! the node's RPC categories across the submodules; they all live on the
//! same [`NodeClient`].

mod blockchain;
mod control;
mod freeze;
mod mining;
mod network;
mod tx;
mod util;
mod wallet;

use serde_json::Value;

use crate::config::RpcConfig;
use crate::error::CoreError;
use crate::rpc::Dispatcher;

/// High-level client for a single node.
#[derive(Clone)]
pub struct NodeClient {
    rpc: Dispatcher,
}

impl NodeClient {
    pub fn new(rpc: Dispatcher) -> Self {
        Self { rpc }
    }

    pub fn connect(config: RpcConfig) -> Result<Self, CoreError> {
        Ok(Self::new(Dispatcher::connect(config)?))
    }

    /// The underlying dispatcher, for methods without a typed wrapper.
    pub fn rpc(&self) -> &Dispatcher {
        &self.rpc
    }
}

/// Append optional trailing parameters, stopping at the first `None` so
/// positional meaning is never shifted.
fn push_optional(params: &mut Vec<Value>, optional: impl IntoIterator<Item = Option<Value>>) {
    for value in optional {
        match value {
            Some(value) => params.push(value),
            None => break,
        }
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn push_optional_stops_at_first_gap() {
        let mut params = vec![json!("a")];
        push_optional(&mut params, [Some(json!(1)), None, Some(json!(true))]);
        assert_eq!(params, vec![json!("a"), json!(1)]);
    }
}
