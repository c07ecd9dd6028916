//! Result shapes returned by the typed [`NodeClient`](crate::client::NodeClient)
//! operations.
//!
//! Field names follow the node's JSON; amounts are BTC-denominated floats
//! on the wire and carried as [`Amount`]. Fields that differ across node
//! versions are optional or defaulted so older nodes still decode.

use bitcoin::consensus::encode::serialize_hex;
use bitcoin::{Amount, BlockHash, SignedAmount, Transaction, Txid};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Control
// ==============================================================================

/// General node state from `getinfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub version: u64,
    #[serde(rename = "protocolversion")]
    pub protocol_version: u64,
    pub blocks: u64,
    #[serde(rename = "timeoffset", default)]
    pub time_offset: i64,
    pub connections: u64,
    #[serde(default)]
    pub proxy: String,
    pub difficulty: f64,
    #[serde(default)]
    pub testnet: bool,
    #[serde(default)]
    pub stn: bool,
    #[serde(rename = "relayfee", with = "bitcoin::amount::serde::as_btc")]
    pub relay_fee: Amount,
    #[serde(default)]
    pub errors: String,
    #[serde(rename = "maxblocksize", default)]
    pub max_block_size: Option<u64>,
    #[serde(rename = "maxminedblocksize", default)]
    pub max_mined_block_size: Option<u64>,
}

/// Allocator statistics from `getmemoryinfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryInfo {
    pub locked: LockedMemory,
    #[serde(rename = "preloading", default)]
    pub preloading: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LockedMemory {
    pub used: u64,
    pub free: u64,
    pub total: u64,
    pub locked: u64,
    pub chunks_used: u64,
    pub chunks_free: u64,
}

/// Policy and consensus limits reported by `getsettings`. Nodes add keys
/// over time, so everything beyond the stable core is kept raw.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(rename = "excessiveblocksize")]
    pub excessive_block_size: u64,
    #[serde(rename = "blockmaxsize")]
    pub block_max_size: u64,
    #[serde(rename = "maxtxsizepolicy")]
    pub max_tx_size_policy: u64,
    #[serde(rename = "minminingtxfee", with = "bitcoin::amount::serde::as_btc")]
    pub min_mining_tx_fee: Amount,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

// ==============================================================================
// Blockchain
// ==============================================================================

/// Basic chain information from `getblockchaininfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainInfo {
    pub chain: String,
    pub blocks: u64,
    pub headers: u64,
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: BlockHash,
    pub difficulty: f64,
    #[serde(rename = "mediantime")]
    pub median_time: u64,
    #[serde(rename = "verificationprogress")]
    pub verification_progress: f64,
    #[serde(rename = "chainwork")]
    pub chain_work: String,
    pub pruned: bool,
}

/// Decoded block header from `getblockheader <hash> true`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockHeader {
    pub hash: BlockHash,
    /// `-1` when the block is not on the active chain.
    pub confirmations: i64,
    pub height: u64,
    pub version: i32,
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,
    #[serde(rename = "num_tx", default)]
    pub num_tx: Option<u64>,
    pub time: u64,
    #[serde(rename = "mediantime")]
    pub median_time: u64,
    pub nonce: u32,
    pub bits: String,
    pub difficulty: f64,
    #[serde(rename = "chainwork")]
    pub chain_work: String,
    #[serde(rename = "previousblockhash", default)]
    pub previous_block_hash: Option<BlockHash>,
    #[serde(rename = "nextblockhash", default)]
    pub next_block_hash: Option<BlockHash>,
}

/// One entry of `getchaintips`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainTip {
    pub height: u64,
    pub hash: BlockHash,
    #[serde(rename = "branchlen")]
    pub branch_len: u64,
    pub status: String,
}

/// Mempool entry from `getmempoolentry`.
#[derive(Debug, Clone, Deserialize)]
pub struct MempoolEntry {
    pub size: u64,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub fee: Amount,
    /// Fee after `prioritisetransaction` deltas; negative deltas can push it
    /// below zero.
    #[serde(rename = "modifiedfee", with = "bitcoin::amount::serde::as_btc")]
    pub modified_fee: SignedAmount,
    pub time: u64,
    pub height: u64,
    #[serde(default)]
    pub depends: Vec<Txid>,
}

/// Unspent output details from `gettxout`.
#[derive(Debug, Clone, Deserialize)]
pub struct TxOutInfo {
    #[serde(rename = "bestblock")]
    pub best_block: BlockHash,
    pub confirmations: u64,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub value: Amount,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
    #[serde(default)]
    pub coinbase: bool,
}

/// Locking script as the node describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptPubKey {
    #[serde(default)]
    pub asm: String,
    pub hex: String,
    #[serde(rename = "type", default)]
    pub script_type: Option<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// UTXO set summary from `gettxoutsetinfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSetInfo {
    pub height: u64,
    #[serde(rename = "bestblock")]
    pub best_block: BlockHash,
    pub transactions: u64,
    #[serde(rename = "txouts")]
    pub output_count: u64,
    #[serde(rename = "bogosize")]
    pub bogo_size: u64,
    #[serde(rename = "hash_serialized")]
    pub hash_serialized: String,
    #[serde(default)]
    pub disk_size: u64,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub total_amount: Amount,
}

// ==============================================================================
// Mining
// ==============================================================================

/// Mining state from `getmininginfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningInfo {
    pub blocks: u64,
    #[serde(rename = "currentblocksize", default)]
    pub current_block_size: u64,
    #[serde(rename = "currentblocktx", default)]
    pub current_block_tx: u64,
    pub difficulty: f64,
    #[serde(default)]
    pub errors: String,
    #[serde(rename = "networkhashps")]
    pub network_hash_ps: f64,
    #[serde(rename = "pooledtx")]
    pub pooled_tx: u64,
    pub chain: String,
}

/// Block template from `getminingcandidate`. The miner assembles the
/// coinbase itself unless it asked the node to include one.
#[derive(Debug, Clone, Deserialize)]
pub struct MiningCandidate {
    pub id: String,
    #[serde(rename = "prevhash")]
    pub prev_hash: BlockHash,
    /// Coinbase transaction hex, only present when requested.
    #[serde(default)]
    pub coinbase: Option<String>,
    #[serde(rename = "coinbaseValue", with = "bitcoin::amount::serde::as_sat")]
    pub coinbase_value: Amount,
    pub version: i32,
    #[serde(rename = "nBits")]
    pub bits: String,
    pub time: u64,
    pub height: u64,
    #[serde(rename = "num_tx")]
    pub num_tx: u64,
    #[serde(rename = "sizeWithoutCoinbase")]
    pub size_without_coinbase: u64,
    /// Merkle branch for the coinbase, leaf first.
    #[serde(rename = "merkleProof", default)]
    pub merkle_proof: Vec<String>,
}

/// Solved candidate for `submitminingsolution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiningSolution {
    pub id: String,
    pub nonce: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

// ==============================================================================
// Network
// ==============================================================================

/// Network state from `getnetworkinfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkInfo {
    pub version: u64,
    pub subversion: String,
    #[serde(rename = "protocolversion")]
    pub protocol_version: u64,
    #[serde(rename = "localservices")]
    pub local_services: String,
    #[serde(rename = "localrelay")]
    pub local_relay: bool,
    #[serde(rename = "timeoffset")]
    pub time_offset: i64,
    pub connections: u64,
    #[serde(rename = "networkactive")]
    pub network_active: bool,
    #[serde(rename = "relayfee", with = "bitcoin::amount::serde::as_btc")]
    pub relay_fee: Amount,
    #[serde(default)]
    pub warnings: String,
}

/// Traffic counters from `getnettotals`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkTotals {
    #[serde(rename = "totalbytesrecv")]
    pub total_bytes_recv: u64,
    #[serde(rename = "totalbytessent")]
    pub total_bytes_sent: u64,
    #[serde(rename = "timemillis")]
    pub time_millis: u64,
}

/// One connected peer from `getpeerinfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerInfo {
    pub id: u64,
    pub addr: String,
    #[serde(default)]
    pub services: String,
    #[serde(rename = "conntime", default)]
    pub conn_time: u64,
    #[serde(rename = "pingtime", default)]
    pub ping_time: Option<f64>,
    #[serde(default)]
    pub version: u64,
    #[serde(rename = "subver", default)]
    pub sub_version: String,
    pub inbound: bool,
    #[serde(rename = "startingheight", default)]
    pub starting_height: i64,
    #[serde(rename = "banscore", default)]
    pub ban_score: u64,
}

/// One banned subnet from `listbanned`.
#[derive(Debug, Clone, Deserialize)]
pub struct BannedSubnet {
    pub address: String,
    pub banned_until: u64,
    pub ban_created: u64,
    #[serde(default)]
    pub ban_reason: String,
}

/// Action for `addnode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAddAction {
    Add,
    Remove,
    OneTry,
}

/// Action for `setban`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BanAction {
    Add,
    Remove,
}

/// Which peer `disconnectnode` should drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectTarget {
    Address(String),
    NodeId(u64),
}

// ==============================================================================
// Utility
// ==============================================================================

/// Address details from `validateaddress`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateAddress {
    #[serde(rename = "isvalid")]
    pub is_valid: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "scriptPubKey", default)]
    pub script_pub_key: Option<String>,
    #[serde(rename = "ismine", default)]
    pub is_mine: Option<bool>,
    #[serde(rename = "iswatchonly", default)]
    pub is_watch_only: Option<bool>,
    #[serde(rename = "isscript", default)]
    pub is_script: Option<bool>,
}

/// Multisig address and redeem script from `createmultisig`.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiSig {
    pub address: String,
    #[serde(rename = "redeemScript")]
    pub redeem_script: String,
}

// ==============================================================================
// Wallet
// ==============================================================================

/// Wallet state from `getwalletinfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletInfo {
    #[serde(rename = "walletname")]
    pub wallet_name: String,
    #[serde(rename = "walletversion")]
    pub wallet_version: u64,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub balance: Amount,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub unconfirmed_balance: Amount,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub immature_balance: Amount,
    #[serde(rename = "txcount")]
    pub tx_count: u64,
    #[serde(rename = "keypoolsize")]
    pub keypool_size: u64,
    #[serde(rename = "paytxfee", with = "bitcoin::amount::serde::as_btc")]
    pub pay_tx_fee: Amount,
    #[serde(default)]
    pub unlocked_until: Option<u64>,
}

/// One spendable output from `listunspent`.
#[derive(Debug, Clone, Deserialize)]
pub struct Unspent {
    pub txid: Txid,
    pub vout: u32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: String,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
    pub confirmations: u64,
    pub spendable: bool,
    #[serde(default)]
    pub safe: Option<bool>,
}

/// An outpoint, as accepted by `createrawtransaction` and reported for
/// unconfirmed ancestors by `sendrawtransactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInputRef {
    pub txid: Txid,
    pub vout: u32,
}

// ==============================================================================
// Batch submission
// ==============================================================================

/// One transaction for `sendrawtransactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTxSubmission {
    pub hex: String,
    #[serde(rename = "allowhighfees")]
    pub allow_high_fees: bool,
    #[serde(rename = "dontcheckfee")]
    pub dont_check_fee: bool,
    #[serde(rename = "listunconfirmedancestors")]
    pub list_unconfirmed_ancestors: bool,
}

impl RawTxSubmission {
    /// Submit `tx` with the node's default fee checks.
    pub fn new(tx: &Transaction) -> Self {
        Self {
            hex: serialize_hex(tx),
            allow_high_fees: false,
            dont_check_fee: false,
            list_unconfirmed_ancestors: false,
        }
    }
}

/// Outcome of `sendrawtransactions`. Every list is empty when all
/// transactions were accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendRawTransactionsResult {
    /// Already in the mempool or chain.
    #[serde(default)]
    pub known: Vec<Txid>,
    /// Accepted, then evicted from the mempool.
    #[serde(default)]
    pub evicted: Vec<Txid>,
    #[serde(default)]
    pub invalid: Vec<RejectedTx>,
    /// Only listed when `list_unconfirmed_ancestors` was set.
    #[serde(default)]
    pub unconfirmed: Vec<UnconfirmedTx>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectedTx {
    pub txid: Txid,
    pub reject_code: i64,
    pub reject_reason: String,
    #[serde(rename = "collidedWith", default)]
    pub collided_with: Vec<CollidedTx>,
}

/// A mempool transaction that double-spends a rejected submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CollidedTx {
    pub txid: Txid,
    pub size: u64,
    pub hex: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnconfirmedTx {
    pub txid: Txid,
    #[serde(default)]
    pub ancestors: Vec<UnconfirmedAncestor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnconfirmedAncestor {
    pub txid: Txid,
    #[serde(default)]
    pub vin: Vec<TxInputRef>,
}

// ==============================================================================
// Freezing and confiscation
// ==============================================================================

/// Outpoint as spelled by the freeze and confiscation RPCs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenOutpoint {
    #[serde(rename = "txId")]
    pub txid: Txid,
    pub vout: u32,
}

/// Heights over which a freeze is enforced. An absent `stop` freezes
/// indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnforceRange {
    pub start: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<u64>,
}

/// A fund for `addToConsensusBlacklist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrozenFund {
    pub tx_out: FrozenOutpoint,
    pub enforce_at_height: Vec<EnforceRange>,
    pub policy_expires_with_consensus: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlacklistResult {
    #[serde(rename = "notProcessed", default)]
    pub not_processed: Vec<UnprocessedFund>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnprocessedFund {
    #[serde(rename = "txOut")]
    pub tx_out: FrozenOutpoint,
    pub reason: String,
}

/// A confiscation transaction for `addToConfiscationTxidWhitelist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiscationTx {
    pub enforce_at_height: u64,
    pub hex: String,
}

impl ConfiscationTx {
    pub fn new(tx: &Transaction, enforce_at_height: u64) -> Self {
        Self {
            enforce_at_height,
            hex: serialize_hex(tx),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhitelistResult {
    #[serde(rename = "notProcessed", default)]
    pub not_processed: Vec<UnprocessedConfiscation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnprocessedConfiscation {
    #[serde(rename = "confiscationTx")]
    pub confiscation_tx: ConfiscationTxRef,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfiscationTxRef {
    #[serde(rename = "txId")]
    pub txid: Txid,
}
