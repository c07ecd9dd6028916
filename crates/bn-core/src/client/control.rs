use std::time::Duration;

use crate::error::CoreError;
use crate::types::{Info, MemoryInfo, Settings};

use super::NodeClient;

impl NodeClient {
    pub async fn info(&self) -> Result<Info, CoreError> {
        self.rpc.call("getinfo", Vec::new()).await
    }

    pub async fn memory_info(&self) -> Result<MemoryInfo, CoreError> {
        self.rpc.call("getmemoryinfo", Vec::new()).await
    }

    pub async fn settings(&self) -> Result<Settings, CoreError> {
        self.rpc.call("getsettings", Vec::new()).await
    }

    /// Startup parameters the node is running with (`dumpparameters`).
    pub async fn dump_parameters(&self) -> Result<Vec<String>, CoreError> {
        self.rpc.call("dumpparameters", Vec::new()).await
    }

    pub async fn uptime(&self) -> Result<Duration, CoreError> {
        let secs: u64 = self.rpc.call("uptime", Vec::new()).await?;
        Ok(Duration::from_secs(secs))
    }

    /// Ask the node to shut down gracefully.
    pub async fn stop(&self) -> Result<(), CoreError> {
        self.rpc.execute("stop", Vec::new()).await
    }
}
