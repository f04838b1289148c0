//! CLI entry point.
//!
//! Exit codes: 0 on success, 1 on submission/confirmation failure,
//! 2 on missing or invalid configuration (detected before any network
//! activity).

use std::process::ExitCode;

use alloy::primitives::{Bytes, U256};
use clap::Parser;

use eoa_upgrader::bundler::types::UserOperationRequest;
use eoa_upgrader::bundler::{BundlerClient, Wallet};
use eoa_upgrader::config::{load_config, UpgraderConfig};
use eoa_upgrader::observability::logging;
use eoa_upgrader::submission::{classify_failure, remediation};
use eoa_upgrader::UpgradePipeline;

#[derive(Parser)]
#[command(name = "eoa-upgrader")]
#[command(about = "Upgrade an EOA to a smart account via EIP-7702", long_about = None)]
struct Cli {
    /// Call target (overrides TARGET_ADDRESS).
    #[arg(long)]
    target: Option<String>,

    /// Value to attach, in wei (decimal or 0x-prefixed hex).
    #[arg(long, default_value = "0")]
    value: String,

    /// Hex call data to forward to the target.
    #[arg(long, default_value = "0x")]
    data: String,

    /// Submission deadline in seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// After confirmation, check who actually paid gas.
    #[arg(long)]
    verify_sponsorship: bool,

    /// After confirmation, decode the counter event from the receipt.
    #[arg(long)]
    decode_event: bool,
}

/// Apply CLI flags on top of the environment-sourced configuration.
fn apply_cli(config: &mut UpgraderConfig, cli: &Cli) -> Result<(), String> {
    if let Some(target) = &cli.target {
        config.target_address = target
            .parse()
            .map_err(|e| format!("--target '{}' is not a valid address: {}", target, e))?;
    }
    config.value = cli
        .value
        .parse::<U256>()
        .map_err(|e| format!("--value '{}' is not a non-negative integer: {}", cli.value, e))?;
    config.call_data = cli
        .data
        .parse::<Bytes>()
        .map_err(|e| format!("--data '{}' is not valid hex: {}", cli.data, e))?;
    config.timeout_secs = cli.timeout_secs;
    config.verify_sponsorship = cli.verify_sponsorship;
    config.decode_event = cli.decode_event;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    // Configuration and key loading both happen before the client is
    // ever constructed; a missing API key or private key aborts here
    // with no network traffic.
    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error");
            return ExitCode::from(2);
        }
    };
    if let Err(reason) = apply_cli(&mut config, &cli) {
        tracing::error!(error = %reason, "Invalid command line argument");
        return ExitCode::from(2);
    }

    let wallet = match Wallet::from_env(config.chain.0) {
        Ok(wallet) => wallet,
        Err(e) => {
            tracing::error!(error = %e, "Wallet error");
            return ExitCode::from(2);
        }
    };
    let eoa = wallet.address();
    tracing::info!(eoa = %eoa, "EOA loaded");
    tracing::info!("Note: under EIP-7702 the smart account address equals the EOA address");

    let client = match BundlerClient::new(&config, wallet) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Client setup failed");
            return ExitCode::from(2);
        }
    };

    let request = UserOperationRequest {
        target: config.target_address,
        value: config.value,
        data: config.call_data.clone(),
    };
    tracing::info!(
        request = %serde_json::json!({
            "target": request.target,
            "value": request.value,
            "data": request.data,
        }),
        "User operation prepared"
    );

    let pipeline = UpgradePipeline::new(&config, client);
    match pipeline.run(request).await {
        Ok(report) => {
            tracing::info!(
                user_op_hash = %report.user_op_hash,
                tx_hash = %report.tx_hash,
                "Upgrade complete"
            );
            if let Some(sponsored) = report.gas_sponsored {
                tracing::info!(sponsored = sponsored, "Sponsorship verification finished");
            }
            if let Some(value) = report.counter_value {
                tracing::info!(counter = %value, "Counter event value");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let cause = e.to_string();
            tracing::error!(error = %cause, "Upgrade failed");
            tracing::info!("--- TROUBLESHOOTING SUGGESTIONS ---");
            for line in remediation(classify_failure(&cause), eoa) {
                tracing::info!("{}", line);
            }
            ExitCode::from(1)
        }
    }
}
