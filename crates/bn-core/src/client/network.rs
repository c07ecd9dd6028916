use serde_json::json;

use crate::error::CoreError;
use crate::types::{
    BanAction, BannedSubnet, DisconnectTarget, NetworkInfo, NetworkTotals, NodeAddAction,
    PeerInfo,
};

use super::{push_optional, NodeClient};

impl NodeClient {
    pub async fn ping(&self) -> Result<(), CoreError> {
        self.rpc.execute("ping", Vec::new()).await
    }

    pub async fn add_node(&self, node: &str, action: NodeAddAction) -> Result<(), CoreError> {
        self.rpc
            .execute("addnode", vec![json!(node), json!(action)])
            .await
    }

    pub async fn clear_banned(&self) -> Result<(), CoreError> {
        self.rpc.execute("clearbanned", Vec::new()).await
    }

    pub async fn disconnect_node(&self, target: &DisconnectTarget) -> Result<(), CoreError> {
        // The node takes either an address or, with an empty address, a
        // node id as the second argument.
        let params = match target {
            DisconnectTarget::Address(addr) => vec![json!(addr)],
            DisconnectTarget::NodeId(id) => vec![json!(""), json!(id)],
        };
        self.rpc.execute("disconnectnode", params).await
    }

    pub async fn connection_count(&self) -> Result<u64, CoreError> {
        self.rpc.call("getconnectioncount", Vec::new()).await
    }

    pub async fn network_totals(&self) -> Result<NetworkTotals, CoreError> {
        self.rpc.call("getnettotals", Vec::new()).await
    }

    pub async fn network_info(&self) -> Result<NetworkInfo, CoreError> {
        self.rpc.call("getnetworkinfo", Vec::new()).await
    }

    pub async fn peer_info(&self) -> Result<Vec<PeerInfo>, CoreError> {
        self.rpc.call("getpeerinfo", Vec::new()).await
    }

    pub async fn list_banned(&self) -> Result<Vec<BannedSubnet>, CoreError> {
        self.rpc.call("listbanned", Vec::new()).await
    }

    /// Ban or unban `subnet`. `ban_time` is seconds (or an absolute unix
    /// time when `absolute` is set); both default on the node side.
    pub async fn set_ban(
        &self,
        subnet: &str,
        action: BanAction,
        ban_time: Option<u64>,
        absolute: Option<bool>,
    ) -> Result<(), CoreError> {
        let mut params = vec![json!(subnet), json!(action)];
        push_optional(&mut params, [ban_time.map(|t| json!(t)), absolute.map(|a| json!(a))]);
        self.rpc.execute("setban", params).await
    }

    pub async fn set_network_active(&self, enabled: bool) -> Result<(), CoreError> {
        self.rpc
            .execute("setnetworkactive", vec![json!(enabled)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::client::testing::client;

    #[tokio::test]
    async fn add_node_serializes_action_lowercase() {
        let (client, transport) = client(|b| b.with_result("addnode", Value::Null));
        client
            .add_node("10.0.0.1:8333", NodeAddAction::OneTry)
            .await
            .expect("addnode should succeed");
        assert_eq!(
            transport.only_request().1,
            vec![json!("10.0.0.1:8333"), json!("onetry")]
        );
    }

    #[tokio::test]
    async fn disconnect_by_id_sends_empty_address() {
        let (client, transport) = client(|b| b.with_result("disconnectnode", Value::Null));
        client
            .disconnect_node(&DisconnectTarget::NodeId(4))
            .await
            .expect("disconnectnode should succeed");
        assert_eq!(transport.only_request().1, vec![json!(""), json!(4)]);
    }

    #[tokio::test]
    async fn set_ban_appends_options_in_order() {
        let (client, transport) = client(|b| b.with_result("setban", Value::Null));
        client
            .set_ban("192.168.0.0/24", BanAction::Add, Some(86400), None)
            .await
            .expect("setban should succeed");
        assert_eq!(
            transport.only_request().1,
            vec![json!("192.168.0.0/24"), json!("add"), json!(86400)]
        );
    }

    #[tokio::test]
    async fn peer_info_decodes_list() {
        let (client, _) = client(|b| {
            b.with_result(
                "getpeerinfo",
                json!([{
                    "id": 0,
                    "addr": "127.0.0.1:18444",
                    "services": "0000000000000025",
                    "conntime": 1700000000,
                    "pingtime": 0.001,
                    "version": 70016,
                    "subver": "/Bitcoin SV:1.0.16/",
                    "inbound": false,
                    "startingheight": 100,
                    "banscore": 0
                }]),
            )
        });
        let peers = client.peer_info().await.expect("should decode");
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].sub_version, "/Bitcoin SV:1.0.16/");
        assert!(!peers[0].inbound);
    }
}
