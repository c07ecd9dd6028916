use bitcoin::{Amount, SignedAmount, Txid};
use serde_json::json;

use crate::error::CoreError;
use crate::types::{Unspent, WalletInfo};

use super::{push_optional, NodeClient};

/// Balances come back as BTC floats; route them through `Amount` so callers
/// never see floating point.
fn btc_to_amount(btc: f64) -> Result<Amount, CoreError> {
    Amount::from_btc(btc)
        .map_err(|e| CoreError::InvalidData(format!("invalid BTC amount {btc}: {e}")))
}

fn btc_to_signed_amount(btc: f64) -> Result<SignedAmount, CoreError> {
    SignedAmount::from_btc(btc)
        .map_err(|e| CoreError::InvalidData(format!("invalid BTC amount {btc}: {e}")))
}

impl NodeClient {
    pub async fn abandon_transaction(&self, txid: &Txid) -> Result<(), CoreError> {
        self.rpc
            .execute("abandontransaction", vec![json!(txid.to_string())])
            .await
    }

    pub async fn backup_wallet(&self, destination: &str) -> Result<(), CoreError> {
        self.rpc
            .execute("backupwallet", vec![json!(destination)])
            .await
    }

    /// Wallet balance, optionally for one account and confirmation depth.
    /// Per-account balances go negative after moves between accounts.
    pub async fn balance(
        &self,
        account: Option<&str>,
        min_confirmations: Option<u32>,
        include_watch_only: Option<bool>,
    ) -> Result<SignedAmount, CoreError> {
        let mut params = Vec::new();
        // Later options are positional, so an explicit account is required
        // before any of them; "*" is the node's "all accounts".
        let account = match (account, min_confirmations, include_watch_only) {
            (None, None, None) => None,
            (account, ..) => Some(json!(account.unwrap_or("*"))),
        };
        push_optional(
            &mut params,
            [
                account,
                min_confirmations.map(|n| json!(n)),
                include_watch_only.map(|w| json!(w)),
            ],
        );
        let btc: f64 = self.rpc.call("getbalance", params).await?;
        btc_to_signed_amount(btc)
    }

    pub async fn unconfirmed_balance(&self) -> Result<Amount, CoreError> {
        let btc: f64 = self.rpc.call("getunconfirmedbalance", Vec::new()).await?;
        btc_to_amount(btc)
    }

    pub async fn new_address(&self, account: Option<&str>) -> Result<String, CoreError> {
        let mut params = Vec::new();
        push_optional(&mut params, [account.map(|a| json!(a))]);
        self.rpc.call("getnewaddress", params).await
    }

    pub async fn raw_change_address(&self) -> Result<String, CoreError> {
        self.rpc.call("getrawchangeaddress", Vec::new()).await
    }

    pub async fn wallet_info(&self) -> Result<WalletInfo, CoreError> {
        self.rpc.call("getwalletinfo", Vec::new()).await
    }

    pub async fn list_unspent(
        &self,
        min_confirmations: Option<u32>,
        max_confirmations: Option<u32>,
    ) -> Result<Vec<Unspent>, CoreError> {
        let mut params = Vec::new();
        push_optional(
            &mut params,
            [
                min_confirmations.map(|n| json!(n)),
                max_confirmations.map(|n| json!(n)),
            ],
        );
        self.rpc.call("listunspent", params).await
    }

    pub async fn list_wallets(&self) -> Result<Vec<String>, CoreError> {
        self.rpc.call("listwallets", Vec::new()).await
    }

    pub async fn send_to_address(
        &self,
        address: &str,
        amount: Amount,
        comment: Option<&str>,
        comment_to: Option<&str>,
    ) -> Result<Txid, CoreError> {
        let mut params = vec![json!(address), json!(amount.to_btc())];
        push_optional(
            &mut params,
            [comment.map(|c| json!(c)), comment_to.map(|c| json!(c))],
        );
        self.rpc.call("sendtoaddress", params).await
    }

    /// Set the wallet's fee rate per kB.
    pub async fn set_tx_fee(&self, fee_per_kb: Amount) -> Result<bool, CoreError> {
        self.rpc
            .call("settxfee", vec![json!(fee_per_kb.to_btc())])
            .await
    }

    pub async fn sign_message(&self, address: &str, message: &str) -> Result<String, CoreError> {
        self.rpc
            .call("signmessage", vec![json!(address), json!(message)])
            .await
    }

    pub async fn encrypt_wallet(&self, passphrase: &str) -> Result<(), CoreError> {
        self.rpc
            .execute("encryptwallet", vec![json!(passphrase)])
            .await
    }

    /// Unlock the wallet for `timeout_secs` seconds.
    pub async fn wallet_passphrase(
        &self,
        passphrase: &str,
        timeout_secs: u64,
    ) -> Result<(), CoreError> {
        self.rpc
            .execute(
                "walletpassphrase",
                vec![json!(passphrase), json!(timeout_secs)],
            )
            .await
    }

    pub async fn wallet_passphrase_change(&self, old: &str, new: &str) -> Result<(), CoreError> {
        self.rpc
            .execute("walletpassphrasechange", vec![json!(old), json!(new)])
            .await
    }

    pub async fn wallet_lock(&self) -> Result<(), CoreError> {
        self.rpc.execute("walletlock", Vec::new()).await
    }
}
