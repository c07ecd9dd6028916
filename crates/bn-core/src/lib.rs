pub mod client;
pub mod config;
pub mod error;
pub mod rpc;
pub mod types;

pub use client::NodeClient;
pub use config::RpcConfig;
pub use error::{CoreError, RpcError};
pub use rpc::Dispatcher;
