use bitcoin::{Block, Txid};
use serde_json::{json, Value};

use crate::error::CoreError;
use crate::types::{MiningCandidate, MiningInfo, MiningSolution};

use super::{push_optional, NodeClient};

impl NodeClient {
    pub async fn mining_info(&self) -> Result<MiningInfo, CoreError> {
        self.rpc.call("getmininginfo", Vec::new()).await
    }

    /// Estimated network hashes per second over the last `blocks` blocks
    /// (node default when `None`), optionally as of `height`.
    pub async fn network_hash_ps(
        &self,
        blocks: Option<i64>,
        height: Option<i64>,
    ) -> Result<f64, CoreError> {
        let mut params = Vec::new();
        push_optional(&mut params, [blocks.map(|n| json!(n)), height.map(|h| json!(h))]);
        self.rpc.call("getnetworkhashps", params).await
    }

    /// Adjust the mining priority of a mempool transaction by `fee_delta`
    /// satoshis.
    pub async fn prioritise_transaction(
        &self,
        txid: &Txid,
        fee_delta: i64,
    ) -> Result<bool, CoreError> {
        // The middle argument is a legacy priority delta the node ignores.
        self.rpc
            .call(
                "prioritisetransaction",
                vec![json!(txid.to_string()), json!(0), json!(fee_delta)],
            )
            .await
    }

    /// Header-only work for the next block. Set `include_coinbase` to have
    /// the node build the coinbase transaction too.
    pub async fn mining_candidate(
        &self,
        include_coinbase: Option<bool>,
    ) -> Result<MiningCandidate, CoreError> {
        let mut params = Vec::new();
        push_optional(&mut params, [include_coinbase.map(|c| json!(c))]);
        self.rpc.call("getminingcandidate", params).await
    }

    /// Submit a solved mining candidate. `None` means accepted; otherwise the
    /// node's rejection reason.
    pub async fn submit_mining_solution(
        &self,
        solution: &MiningSolution,
    ) -> Result<Option<String>, CoreError> {
        let verdict: Value = self
            .rpc
            .call("submitminingsolution", vec![json!(solution)])
            .await?;
        Ok(match verdict {
            Value::Null | Value::Bool(true) => None,
            Value::String(reason) => Some(reason),
            other => Some(other.to_string()),
        })
    }

    /// Submit a mined block. `None` means accepted; otherwise the node's
    /// rejection reason.
    pub async fn submit_block(&self, block: &Block) -> Result<Option<String>, CoreError> {
        let hex = bitcoin::consensus::encode::serialize_hex(block);
        self.rpc.call("submitblock", vec![json!(hex)]).await
    }
}
