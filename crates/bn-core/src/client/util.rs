use serde_json::json;

use crate::error::CoreError;
use crate::types::{MultiSig, ValidateAddress};

use super::NodeClient;

impl NodeClient {
    /// Drop transactions the node has marked invalid; returns bytes freed.
    pub async fn clear_invalid_transactions(&self) -> Result<u64, CoreError> {
        self.rpc.call("clearinvalidtransactions", Vec::new()).await
    }

    pub async fn create_multisig(
        &self,
        required: u32,
        keys: &[String],
    ) -> Result<MultiSig, CoreError> {
        self.rpc
            .call("createmultisig", vec![json!(required), json!(keys)])
            .await
    }

    pub async fn validate_address(&self, address: &str) -> Result<ValidateAddress, CoreError> {
        self.rpc.call("validateaddress", vec![json!(address)]).await
    }

    /// Sign `message` with a WIF-encoded private key, without a wallet.
    pub async fn sign_message_with_priv_key(
        &self,
        wif: &str,
        message: &str,
    ) -> Result<String, CoreError> {
        self.rpc
            .call("signmessagewithprivkey", vec![json!(wif), json!(message)])
            .await
    }

    pub async fn verify_message(
        &self,
        address: &str,
        signature: &str,
        message: &str,
    ) -> Result<bool, CoreError> {
        self.rpc
            .call(
                "verifymessage",
                vec![json!(address), json!(signature), json!(message)],
            )
            .await
    }
}
