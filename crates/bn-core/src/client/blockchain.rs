use bitcoin::consensus::encode::deserialize_hex;
use bitcoin::{Block, BlockHash, Txid};
use serde_json::json;

use crate::error::CoreError;
use crate::types::{BlockHeader, ChainInfo, ChainTip, MempoolEntry, OutputSetInfo, TxOutInfo};

use super::{push_optional, NodeClient};

/// `getblock` verbosity that returns the serialized block as hex.
const VERBOSITY_RAW: u8 = 0;

impl NodeClient {
    pub async fn best_block_hash(&self) -> Result<BlockHash, CoreError> {
        self.rpc.call("getbestblockhash", Vec::new()).await
    }

    /// Serialized block as hex.
    pub async fn block_hex(&self, hash: &BlockHash) -> Result<String, CoreError> {
        self.rpc
            .call(
                "getblock",
                vec![json!(hash.to_string()), json!(VERBOSITY_RAW)],
            )
            .await
    }

    pub async fn block_hex_by_height(&self, height: u64) -> Result<String, CoreError> {
        self.rpc
            .call("getblockbyheight", vec![json!(height), json!(VERBOSITY_RAW)])
            .await
    }

    /// Fetch a block and decode it.
    pub async fn block(&self, hash: &BlockHash) -> Result<Block, CoreError> {
        decode_block_hex(&self.block_hex(hash).await?)
    }

    pub async fn block_by_height(&self, height: u64) -> Result<Block, CoreError> {
        decode_block_hex(&self.block_hex_by_height(height).await?)
    }

    pub async fn chain_info(&self) -> Result<ChainInfo, CoreError> {
        self.rpc.call("getblockchaininfo", Vec::new()).await
    }

    pub async fn block_count(&self) -> Result<u64, CoreError> {
        self.rpc.call("getblockcount", Vec::new()).await
    }

    pub async fn block_hash(&self, height: u64) -> Result<BlockHash, CoreError> {
        self.rpc.call("getblockhash", vec![json!(height)]).await
    }

    pub async fn block_header(&self, hash: &BlockHash) -> Result<BlockHeader, CoreError> {
        self.rpc
            .call("getblockheader", vec![json!(hash.to_string()), json!(true)])
            .await
    }

    pub async fn block_header_hex(&self, hash: &BlockHash) -> Result<String, CoreError> {
        self.rpc
            .call("getblockheader", vec![json!(hash.to_string()), json!(false)])
            .await
    }

    pub async fn chain_tips(&self) -> Result<Vec<ChainTip>, CoreError> {
        self.rpc.call("getchaintips", Vec::new()).await
    }

    pub async fn difficulty(&self) -> Result<f64, CoreError> {
        self.rpc.call("getdifficulty", Vec::new()).await
    }

    pub async fn mempool_entry(&self, txid: &Txid) -> Result<MempoolEntry, CoreError> {
        self.rpc
            .call("getmempoolentry", vec![json!(txid.to_string())])
            .await
    }

    pub async fn raw_mempool_ids(&self) -> Result<Vec<Txid>, CoreError> {
        self.rpc.call("getrawmempool", vec![json!(false)]).await
    }

    pub async fn raw_non_final_mempool(&self) -> Result<Vec<Txid>, CoreError> {
        self.rpc.call("getrawnonfinalmempool", Vec::new()).await
    }

    pub async fn mempool_ancestor_ids(&self, txid: &Txid) -> Result<Vec<Txid>, CoreError> {
        self.rpc
            .call(
                "getmempoolancestors",
                vec![json!(txid.to_string()), json!(false)],
            )
            .await
    }

    pub async fn mempool_descendant_ids(&self, txid: &Txid) -> Result<Vec<Txid>, CoreError> {
        self.rpc
            .call(
                "getmempooldescendants",
                vec![json!(txid.to_string()), json!(false)],
            )
            .await
    }

    /// Details of an unspent output. `None` when the output is spent or
    /// unknown. With `include_mempool` unset the node's default applies
    /// (mempool spends are considered).
    pub async fn tx_out(
        &self,
        txid: &Txid,
        vout: u32,
        include_mempool: Option<bool>,
    ) -> Result<Option<TxOutInfo>, CoreError> {
        let mut params = vec![json!(txid.to_string()), json!(vout)];
        push_optional(&mut params, [include_mempool.map(|m| json!(m))]);
        self.rpc.call("gettxout", params).await
    }

    /// UTXO set statistics. Slow on large chains.
    pub async fn tx_out_set_info(&self) -> Result<OutputSetInfo, CoreError> {
        self.rpc.call("gettxoutsetinfo", Vec::new()).await
    }

    pub async fn invalidate_block(&self, hash: &BlockHash) -> Result<(), CoreError> {
        self.rpc
            .execute("invalidateblock", vec![json!(hash.to_string())])
            .await
    }

    pub async fn precious_block(&self, hash: &BlockHash) -> Result<(), CoreError> {
        self.rpc
            .execute("preciousblock", vec![json!(hash.to_string())])
            .await
    }

    /// Prune up to `height`; returns the height of the last pruned block.
    pub async fn prune_chain(&self, height: u64) -> Result<u64, CoreError> {
        self.rpc.call("pruneblockchain", vec![json!(height)]).await
    }

    pub async fn verify_chain(&self) -> Result<bool, CoreError> {
        self.rpc.call("verifychain", Vec::new()).await
    }

    /// Mine `blocks` blocks to the wallet (regtest only).
    pub async fn generate(
        &self,
        blocks: u32,
        max_tries: Option<u64>,
    ) -> Result<Vec<BlockHash>, CoreError> {
        let mut params = vec![json!(blocks)];
        push_optional(&mut params, [max_tries.map(|n| json!(n))]);
        self.rpc.call("generate", params).await
    }

    pub async fn generate_to_address(
        &self,
        blocks: u32,
        address: &str,
        max_tries: Option<u64>,
    ) -> Result<Vec<BlockHash>, CoreError> {
        let mut params = vec![json!(blocks), json!(address)];
        push_optional(&mut params, [max_tries.map(|n| json!(n))]);
        self.rpc.call("generatetoaddress", params).await
    }
}

fn decode_block_hex(hex: &str) -> Result<Block, CoreError> {
    deserialize_hex(hex).map_err(|e| CoreError::InvalidData(format!("invalid block hex: {e}")))
}
