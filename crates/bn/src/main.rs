mod cli;

use std::future::Future;
use std::time::Duration;

use bn_core::{CoreError, Dispatcher, NodeClient, RpcConfig};
use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::Value;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let mut config = RpcConfig::new(
        &args.rpc_url,
        args.rpc_user.as_deref(),
        args.rpc_pass.as_deref(),
        args.rpc_cookie.as_deref(),
    )
    .context("invalid RPC configuration")?
    .with_client_id(args.client_id.clone());
    if let Some(rps) = args.requests_per_second {
        config = config.with_rate_limit(rps);
    }

    let client = NodeClient::connect(config).context("build RPC client")?;
    let timeout = args.timeout_secs.map(Duration::from_secs);

    let output = match args.command {
        cli::Command::Info => to_json(deadline(&args.rpc_url, timeout, client.info()).await?)?,
        cli::Command::ChainInfo => {
            to_json(deadline(&args.rpc_url, timeout, client.chain_info()).await?)?
        }
        cli::Command::BlockCount => {
            to_json(deadline(&args.rpc_url, timeout, client.block_count()).await?)?
        }
        cli::Command::MiningInfo => {
            to_json(deadline(&args.rpc_url, timeout, client.mining_info()).await?)?
        }
        cli::Command::Call {
            method,
            params,
            burst,
        } => {
            let params: Vec<Value> = params.iter().map(|raw| parse_param(raw)).collect();
            let result = burst_call(client.rpc(), timeout, &method, params, burst)
                .await
                .map_err(|err| connect_error(&args.rpc_url, &err))?;
            serde_json::to_string_pretty(&result).context("render result")?
        }
    };

    println!("{output}");
    Ok(())
}

/// Issue `method` `burst` times concurrently through one dispatcher and
/// return the first result. Identical concurrent calls share one round trip.
async fn burst_call(
    rpc: &Dispatcher,
    timeout: Option<Duration>,
    method: &str,
    params: Vec<Value>,
    burst: usize,
) -> Result<Value, CoreError> {
    let calls = (0..burst.max(1)).map(|_| {
        let params = params.clone();
        async move {
            match timeout {
                Some(timeout) => rpc.call_timeout::<Value>(timeout, method, params).await,
                None => rpc.call::<Value>(method, params).await,
            }
        }
    });
    let results = futures::future::join_all(calls).await;

    let completed = results.iter().filter(|r| r.is_ok()).count();
    if burst > 1 {
        tracing::info!(
            rpc.method = method,
            issued = results.len(),
            completed,
            "burst finished"
        );
    }

    results
        .into_iter()
        .next()
        .unwrap_or_else(|| Err(CoreError::InvalidData("no calls issued".to_owned())))
}

async fn deadline<T>(
    rpc_url: &str,
    timeout: Option<Duration>,
    call: impl Future<Output = Result<T, CoreError>>,
) -> eyre::Result<T> {
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| eyre!("call timed out after {}s", limit.as_secs()))?,
        None => call.await,
    };
    result.map_err(|err| connect_error(rpc_url, &err))
}

fn to_json(value: impl serde::Serialize) -> eyre::Result<String> {
    serde_json::to_string_pretty(&value).context("render result")
}

/// Parse a command-line parameter as JSON, treating anything that is not
/// valid JSON as a string.
fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn connect_error(rpc_url: &str, err: &CoreError) -> eyre::Report {
    let message = format_rpc_error(rpc_url, err);
    eyre!(message).wrap_err("RPC call failed")
}

fn format_rpc_error(rpc_url: &str, err: &CoreError) -> String {
    let source_error = err.to_string();
    let mut lines = vec![
        format!("RPC endpoint `{rpc_url}`"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("dns error") || source_error.contains("Could not resolve host") {
        lines.push(
            "hint: hostname resolution failed; verify the endpoint hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("certificate") || source_error.contains("tls") {
        lines.push(
            "hint: TLS handshake failed; verify certificate trust and that the endpoint uses HTTPS"
                .into(),
        );
    } else if source_error.contains("HTTP 401") || source_error.contains("HTTP 403") {
        lines.push(
            "hint: authentication failed; verify --rpc-user/--rpc-pass or --rpc-cookie".into(),
        );
    } else if source_error.contains("HTTP 404") {
        lines.push("hint: endpoint path is invalid; verify the full RPC URL".into());
    } else if matches!(err, CoreError::Rpc(rpc) if rpc.is_transport()) {
        lines.push(
            "hint: request could not be sent; verify the node is running and rpcallowip permits this host"
                .into(),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use bn_core::RpcError;

    use super::*;

    #[test]
    fn params_fall_back_to_strings() {
        assert_eq!(parse_param("12"), serde_json::json!(12));
        assert_eq!(parse_param("true"), serde_json::json!(true));
        assert_eq!(parse_param("[1,\"a\"]"), serde_json::json!([1, "a"]));
        assert_eq!(parse_param("abc"), serde_json::json!("abc"));
        assert_eq!(parse_param("\"12\""), serde_json::json!("12"));
    }

    #[test]
    fn auth_failures_get_a_hint() {
        let err = CoreError::Rpc(RpcError::HttpStatus {
            status: 401,
            body: String::new(),
        });
        let message = format_rpc_error("http://127.0.0.1:8332", &err);
        assert!(message.contains("hint: authentication failed"), "{message}");
    }

    #[test]
    fn server_errors_get_no_hint() {
        let err = CoreError::Rpc(RpcError::ServerError {
            code: -32601,
            message: "Method not found".into(),
        });
        let message = format_rpc_error("http://127.0.0.1:8332", &err);
        assert!(!message.contains("hint:"), "{message}");
    }
}
