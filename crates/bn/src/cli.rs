use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bn: command-line client for Bitcoin SV node JSON-RPC.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node RPC URL.
    #[arg(long, default_value = "http://127.0.0.1:8332", env = "BN_RPC_URL")]
    pub rpc_url: String,

    /// RPC username (requires --rpc-pass).
    #[arg(long, env = "BN_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password (requires --rpc-user).
    #[arg(long, env = "BN_RPC_PASS")]
    pub rpc_pass: Option<String>,

    /// Cookie file with `user:password`, used when no explicit credentials
    /// are given.
    #[arg(long, env = "BN_RPC_COOKIE")]
    pub rpc_cookie: Option<PathBuf>,

    /// JSON-RPC id sent with every request.
    #[arg(long, default_value = bn_core::config::DEFAULT_CLIENT_ID)]
    pub client_id: String,

    /// Maximum outbound RPC requests per second.
    #[arg(long)]
    pub requests_per_second: Option<u32>,

    /// Per-call deadline in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print `getinfo`.
    Info,
    /// Print `getblockchaininfo`.
    ChainInfo,
    /// Print the current block height.
    BlockCount,
    /// Print `getmininginfo`.
    MiningInfo,
    /// Call any RPC method and print the raw result.
    Call {
        /// RPC method name.
        method: String,

        /// Positional parameters. Each is parsed as JSON, falling back to a
        /// plain string.
        params: Vec<String>,

        /// Issue the same call this many times concurrently.
        #[arg(long, default_value = "1")]
        burst: usize,
    },
}
