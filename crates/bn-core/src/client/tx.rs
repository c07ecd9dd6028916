use bitcoin::consensus::encode::{deserialize_hex, serialize_hex};
use bitcoin::{Amount, Transaction, Txid};
use futures::future::try_join_all;
use serde_json::json;

use crate::error::{CoreError, RpcError};
use crate::types::{RawTxSubmission, SendRawTransactionsResult, TxInputRef};

use super::{push_optional, NodeClient};

impl NodeClient {
    /// Fetch and decode a transaction by txid.
    ///
    /// Requires `-txindex` on the node for confirmed transactions that do
    /// not belong to the wallet.
    pub async fn raw_transaction(&self, txid: &Txid) -> Result<Transaction, CoreError> {
        let hex: String = self
            .rpc
            .call(
                "getrawtransaction",
                vec![json!(txid.to_string()), json!(false)],
            )
            .await
            .map_err(|err| normalize_getrawtransaction_error(txid, err))?;
        decode_tx_hex(&hex)
    }

    /// Fetch many transactions concurrently. Repeated txids share one
    /// round trip through the dispatcher.
    pub async fn raw_transactions(&self, txids: &[Txid]) -> Result<Vec<Transaction>, CoreError> {
        try_join_all(txids.iter().map(|txid| self.raw_transaction(txid))).await
    }

    /// Broadcast a signed transaction and return its txid.
    pub async fn send_raw_transaction(
        &self,
        tx: &Transaction,
        allow_high_fees: Option<bool>,
        dont_check_fee: Option<bool>,
    ) -> Result<Txid, CoreError> {
        let mut params = vec![json!(serialize_hex(tx))];
        push_optional(
            &mut params,
            [
                allow_high_fees.map(|v| json!(v)),
                dont_check_fee.map(|v| json!(v)),
            ],
        );
        self.rpc.call("sendrawtransaction", params).await
    }

    /// Broadcast a batch in one call. Rejections are reported per
    /// transaction in the result rather than failing the whole call.
    pub async fn send_raw_transactions(
        &self,
        txs: &[RawTxSubmission],
    ) -> Result<SendRawTransactionsResult, CoreError> {
        let result: Option<SendRawTransactionsResult> = self
            .rpc
            .call("sendrawtransactions", vec![json!(txs)])
            .await?;
        Ok(result.unwrap_or_default())
    }

    /// Build an unsigned transaction spending `inputs` to `outputs`
    /// (address → amount).
    pub async fn create_raw_transaction(
        &self,
        inputs: &[TxInputRef],
        outputs: &[(String, Amount)],
    ) -> Result<Transaction, CoreError> {
        let outputs: serde_json::Map<String, serde_json::Value> = outputs
            .iter()
            .map(|(address, amount)| (address.clone(), json!(amount.to_btc())))
            .collect();
        let hex: String = self
            .rpc
            .call("createrawtransaction", vec![json!(inputs), json!(outputs)])
            .await?;
        decode_tx_hex(&hex)
    }
}

fn decode_tx_hex(hex: &str) -> Result<Transaction, CoreError> {
    deserialize_hex(hex)
        .map_err(|e| CoreError::InvalidData(format!("invalid transaction hex: {e}")))
}

// ==============================================================================
// RPC Error Normalization
// ==============================================================================

/// Convert "missing tx" JSON-RPC responses into `TxNotFound`.
///
/// Keeps not-found semantics strongly typed for callers, while preserving
/// other RPC/transport failures as-is.
fn normalize_getrawtransaction_error(txid: &Txid, err: CoreError) -> CoreError {
    match err {
        CoreError::Rpc(RpcError::ServerError { code, message })
            if is_tx_not_found_server_error(code, &message) =>
        {
            CoreError::TxNotFound(*txid)
        }
        other => other,
    }
}

fn is_tx_not_found_server_error(code: i64, message: &str) -> bool {
    if code != -5 {
        return false;
    }

    let msg = message.to_ascii_lowercase();
    msg.contains("not found") || msg.contains("no such mempool or blockchain transaction")
}
