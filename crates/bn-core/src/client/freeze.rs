//! Consensus freezing of funds and whitelisting of the transactions that
//! confiscate them.

use serde_json::json;

use crate::error::CoreError;
use crate::types::{BlacklistResult, ConfiscationTx, FrozenFund, WhitelistResult};

use super::NodeClient;

impl NodeClient {
    /// Freeze `funds` at consensus level. Funds the node could not freeze
    /// come back in `not_processed` with a reason.
    pub async fn add_to_consensus_blacklist(
        &self,
        funds: &[FrozenFund],
    ) -> Result<BlacklistResult, CoreError> {
        self.rpc
            .call("addToConsensusBlacklist", vec![json!({ "funds": funds })])
            .await
    }

    /// Whitelist confiscation transactions spending frozen funds.
    pub async fn add_to_confiscation_whitelist(
        &self,
        txs: &[ConfiscationTx],
    ) -> Result<WhitelistResult, CoreError> {
        let wrapped: Vec<_> = txs
            .iter()
            .map(|tx| json!({ "confiscationTx": tx }))
            .collect();
        self.rpc
            .call(
                "addToConfiscationTxidWhitelist",
                vec![json!({ "confiscationTxs": wrapped })],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::hashes::Hash;
    use bitcoin::Txid;

    use super::*;
    use crate::client::testing::client;
    use crate::types::{EnforceRange, FrozenOutpoint};

    fn txid(byte: u8) -> Txid {
        Txid::from_byte_array([byte; 32])
    }

    #[tokio::test]
    async fn blacklist_sends_funds_in_node_spelling() {
        let (client, transport) =
            client(|b| b.with_result("addToConsensusBlacklist", json!({"notProcessed": []})));
        let fund = FrozenFund {
            tx_out: FrozenOutpoint {
                txid: txid(1),
                vout: 0,
            },
            enforce_at_height: vec![
                EnforceRange {
                    start: 100,
                    stop: Some(200),
                },
                EnforceRange {
                    start: 300,
                    stop: None,
                },
            ],
            policy_expires_with_consensus: false,
        };

        let result = client
            .add_to_consensus_blacklist(&[fund])
            .await
            .expect("blacklist should succeed");
        assert!(result.not_processed.is_empty());
        assert_eq!(
            transport.only_request().1,
            vec![json!({"funds": [{
                "txOut": {"txId": txid(1).to_string(), "vout": 0},
                "enforceAtHeight": [{"start": 100, "stop": 200}, {"start": 300}],
                "policyExpiresWithConsensus": false
            }]})]
        );
    }

    #[tokio::test]
    async fn blacklist_reports_unprocessed_funds() {
        let (client, _) = client(|b| {
            b.with_result(
                "addToConsensusBlacklist",
                json!({"notProcessed": [{
                    "txOut": {"txId": txid(2).to_string(), "vout": 3},
                    "reason": "already frozen"
                }]}),
            )
        });

        let result = client
            .add_to_consensus_blacklist(&[])
            .await
            .expect("result should decode");
        assert_eq!(result.not_processed.len(), 1);
        assert_eq!(
            result.not_processed[0].tx_out,
            FrozenOutpoint {
                txid: txid(2),
                vout: 3
            }
        );
        assert_eq!(result.not_processed[0].reason, "already frozen");
    }

    #[tokio::test]
    async fn whitelist_wraps_each_transaction() {
        let genesis = bitcoin::blockdata::constants::genesis_block(bitcoin::Network::Regtest);
        let tx = &genesis.txdata[0];
        let (client, transport) = client(|b| {
            b.with_result(
                "addToConfiscationTxidWhitelist",
                json!({"notProcessed": [{
                    "confiscationTx": {"txId": tx.compute_txid().to_string()},
                    "reason": "confiscation transaction is not valid"
                }]}),
            )
        });

        let result = client
            .add_to_confiscation_whitelist(&[ConfiscationTx::new(tx, 10_000)])
            .await
            .expect("whitelist result should decode");
        assert_eq!(result.not_processed[0].confiscation_tx.txid, tx.compute_txid());

        let hex = bitcoin::consensus::encode::serialize_hex(tx);
        assert_eq!(
            transport.only_request(),
            (
                "addToConfiscationTxidWhitelist".to_owned(),
                vec![json!({"confiscationTxs": [
                    {"confiscationTx": {"enforceAtHeight": 10000, "hex": hex}}
                ]})]
            )
        );
    }
}
