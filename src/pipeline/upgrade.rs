//! Pipeline driver.

use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};

use crate::bundler::types::{BundlerError, BundlerResult, UserOperationRequest};
use crate::bundler::BundlerClient;
use crate::config::UpgraderConfig;
use crate::events::scan_for_counter_event;
use crate::submission::{OperationRunner, SubmissionOutcome};

/// How long the confirmation waiter polls before giving up. Inclusion
/// routinely takes a minute or two on Sepolia, so this is deliberately
/// longer than the submission deadline.
const CONFIRMATION_WAIT_SECS: u64 = 180;

/// What the pipeline produced, for final reporting.
#[derive(Debug)]
pub struct UpgradeReport {
    /// Bundler-side handle of the accepted operation.
    pub user_op_hash: crate::bundler::UserOperationHash,
    /// Transaction the operation was included in.
    pub tx_hash: TxHash,
    /// Sponsorship verdict, when the stage ran.
    pub gas_sponsored: Option<bool>,
    /// Decoded counter value, when the stage ran and found the event.
    pub counter_value: Option<U256>,
}

/// Drives `submit → confirm → [verify sponsorship] → [scan event]`.
pub struct UpgradePipeline {
    client: BundlerClient,
    runner: OperationRunner,
    target_contract: Address,
    timeout_secs: u64,
    verify_sponsorship: bool,
    decode_event: bool,
}

impl UpgradePipeline {
    /// Assemble the pipeline from configuration and a ready client.
    pub fn new(config: &UpgraderConfig, client: BundlerClient) -> Self {
        Self {
            client,
            runner: OperationRunner::new(Duration::from_secs(config.timeout_secs)),
            target_contract: config.target_address,
            timeout_secs: config.timeout_secs,
            verify_sponsorship: config.verify_sponsorship,
            decode_event: config.decode_event,
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// A timed-out submission surfaces as [`BundlerError::Timeout`] so
    /// the caller classifies it from the same error channel as every
    /// other failure.
    pub async fn run(&self, request: UserOperationRequest) -> BundlerResult<UpgradeReport> {
        tracing::info!(eoa = %self.client.sender(), "Upgrading EOA to smart account via EIP-7702");
        tracing::info!("This submits a user operation carrying a signed delegation to the bundler");

        let outcome = self.runner.run(|| self.client.submit(&request)).await;

        let user_op_hash = match outcome {
            SubmissionOutcome::Success(hash) => hash,
            SubmissionOutcome::TimedOut => {
                return Err(BundlerError::Timeout(self.timeout_secs));
            }
            SubmissionOutcome::Failed(cause) => return Err(cause),
        };
        tracing::info!(user_op_hash = %user_op_hash, "User operation accepted by bundler");

        tracing::info!("Waiting for the operation to be mined; this can take a minute or two");
        let tx_hash = self
            .client
            .wait_for_transaction(user_op_hash, CONFIRMATION_WAIT_SECS)
            .await?;
        tracing::info!(
            tx_hash = %tx_hash,
            explorer = %format!("https://sepolia.etherscan.io/tx/{}", tx_hash),
            "Operation confirmed on-chain"
        );

        let gas_sponsored = if self.verify_sponsorship {
            Some(self.verify_sponsorship_stage(tx_hash).await?)
        } else {
            None
        };

        let counter_value = if self.decode_event {
            self.scan_event_stage(tx_hash).await?
        } else {
            None
        };

        tracing::info!("EOA successfully upgraded to a smart account");
        Ok(UpgradeReport {
            user_op_hash,
            tx_hash,
            gas_sponsored,
            counter_value,
        })
    }

    /// Did someone else pay for gas? Under sponsorship the including
    /// transaction is signed by the bundler's EOA, not ours.
    async fn verify_sponsorship_stage(&self, tx_hash: TxHash) -> BundlerResult<bool> {
        let payer = self.client.transaction_sender(tx_hash).await?;
        let sponsored = payer != self.client.sender();
        if sponsored {
            tracing::info!(payer = %payer, "Gas was paid by a third party; sponsorship worked");
        } else {
            tracing::warn!(payer = %payer, "Gas was paid by the EOA itself; no sponsorship applied");
        }
        Ok(sponsored)
    }

    /// Pull the receipt and look for the counter event on the target.
    async fn scan_event_stage(&self, tx_hash: TxHash) -> BundlerResult<Option<U256>> {
        let logs = self.client.transaction_logs(tx_hash).await?;
        match scan_for_counter_event(&logs, self.target_contract) {
            Some(value) => {
                tracing::info!(value = %value, "Counter event decoded from receipt");
                Ok(Some(value))
            }
            None => {
                tracing::info!(
                    contract = %self.target_contract,
                    "No counter event found in receipt; target may not emit it"
                );
                Ok(None)
            }
        }
    }
}
