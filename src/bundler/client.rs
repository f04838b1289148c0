//! Bundler RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the Alchemy bundler/node endpoint
//! - Build, sign and submit ERC-4337 user operations (EIP-7702 mode)
//! - Request paymaster sponsorship when a gas policy is configured
//! - Poll for on-chain inclusion
//!
//! The RPC URL embeds the API key and is therefore never logged.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::{TransactionBuilder, TransactionResponse};
use alloy::primitives::{address, Address, Bytes, TxHash, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Log, TransactionRequest};
use alloy::sol;
use alloy::sol_types::SolCall;
use alloy::transports::TransportResult;
use serde::Deserialize;
use serde_json::json;
use tokio::time::{interval, timeout};

use crate::bundler::types::{
    BundlerError, BundlerResult, UserOperationHash, UserOperationRequest,
};
use crate::bundler::user_op::UserOperationV07;
use crate::bundler::wallet::Wallet;
use crate::config::UpgraderConfig;

/// ERC-4337 v0.7 entry point, same address on all chains.
pub const ENTRY_POINT_V07: Address = address!("0x0000000071727De22E5E9d8BAf0edAc6f37da032");

/// Modular Account v2 implementation the EOA delegates to under
/// EIP-7702.
pub const MODULAR_ACCOUNT_V2_7702: Address = address!("0x69007702764179F14F51cdce752f4f775d74E139");

/// Per-request RPC timeout. Distinct from the submission deadline the
/// runner enforces around the whole attempt.
const RPC_TIMEOUT_SECS: u64 = 20;

/// How often to ask the bundler whether the operation landed.
const CONFIRMATION_POLL_SECS: u64 = 2;

/// Placeholder signature used for gas estimation before signing.
const DUMMY_SIGNATURE_LEN: usize = 65;

sol! {
    /// The slice of the entry point surface this client needs.
    interface IEntryPoint {
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce);
    }

    /// Execution surface of the delegated modular account.
    interface IModularAccount {
        function execute(address target, uint256 value, bytes calldata data) external payable returns (bytes memory);
    }
}

/// Gas fields returned by `eth_estimateUserOperationGas`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GasEstimate {
    pre_verification_gas: U256,
    verification_gas_limit: U256,
    call_gas_limit: U256,
}

/// Gas and paymaster fields returned by
/// `alchemy_requestGasAndPaymasterAndData`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GasAndPaymaster {
    call_gas_limit: U256,
    verification_gas_limit: U256,
    pre_verification_gas: U256,
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    paymaster: Address,
    paymaster_data: Bytes,
    paymaster_verification_gas_limit: U256,
    paymaster_post_op_gas_limit: U256,
}

/// Subset of `eth_getUserOperationReceipt` the waiter consumes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserOperationReceipt {
    success: bool,
    receipt: IncludedReceipt,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncludedReceipt {
    transaction_hash: TxHash,
}

/// Client for the account-abstraction stack: user operation submission,
/// sponsorship and confirmation, all behind one narrow surface.
#[derive(Clone)]
pub struct BundlerClient {
    provider: Arc<dyn Provider + Send + Sync>,
    wallet: Wallet,
    entry_point: Address,
    delegate: Address,
    gas_policy_id: Option<String>,
    chain_id: u64,
    rpc_timeout: Duration,
}

impl BundlerClient {
    /// Create a client from loaded configuration and a wallet.
    ///
    /// Connects lazily: no network traffic happens here.
    pub fn new(config: &UpgraderConfig, wallet: Wallet) -> BundlerResult<Self> {
        let rpc_url: url::Url = format!(
            "https://eth-sepolia.g.alchemy.com/v2/{}",
            config.api_key
        )
        .parse()
        .map_err(|e| BundlerError::Rpc(format!("Invalid RPC URL: {}", e)))?;

        let provider = Arc::new(ProviderBuilder::new().connect_http(rpc_url))
            as Arc<dyn Provider + Send + Sync>;

        let entry_point = ENTRY_POINT_V07;
        let delegate = MODULAR_ACCOUNT_V2_7702;

        tracing::info!(
            chain_id = config.chain.0,
            entry_point = %entry_point,
            delegate = %delegate,
            sponsored = config.sponsored(),
            "Bundler client initialized"
        );

        Ok(Self {
            provider,
            wallet,
            entry_point,
            delegate,
            gas_policy_id: config.gas_policy_id.clone(),
            chain_id: config.chain.0,
            rpc_timeout: Duration::from_secs(RPC_TIMEOUT_SECS),
        })
    }

    /// The EOA (and, post-upgrade, smart account) address.
    pub fn sender(&self) -> Address {
        self.wallet.address()
    }

    /// Submit one user operation to the bundler.
    ///
    /// Builds the EIP-7702 authorization, fills gas (via the paymaster
    /// endpoint when sponsored), signs the v0.7 hash and sends it. A
    /// single call; the deadline race around it lives in the submission
    /// runner.
    pub async fn submit(
        &self,
        request: &UserOperationRequest,
    ) -> BundlerResult<UserOperationHash> {
        let sender = self.wallet.address();

        tracing::info!(target = %request.target, value = %request.value, "Preparing user operation");

        // Account nonce lives in the entry point, not the EOA account.
        let nonce = self.entry_point_nonce(sender).await?;

        // The authorization consumes the EOA's protocol nonce.
        let eoa_nonce = self
            .rpc("eth_getTransactionCount", async {
                self.provider.get_transaction_count(sender).await
            })
            .await?;
        let authorization = self
            .wallet
            .sign_authorization(self.delegate, eoa_nonce)
            .await?;
        tracing::info!(delegate = %self.delegate, nonce = eoa_nonce, "EIP-7702 authorization signed");

        let call_data: Bytes = IModularAccount::executeCall {
            target: request.target,
            value: request.value,
            data: request.data.clone(),
        }
        .abi_encode()
        .into();

        let mut op = UserOperationV07 {
            sender,
            nonce,
            call_data,
            call_gas_limit: U256::ZERO,
            verification_gas_limit: U256::ZERO,
            pre_verification_gas: U256::ZERO,
            max_fee_per_gas: U256::ZERO,
            max_priority_fee_per_gas: U256::ZERO,
            paymaster: None,
            paymaster_verification_gas_limit: None,
            paymaster_post_op_gas_limit: None,
            paymaster_data: None,
            eip7702_auth: Some(authorization),
            signature: vec![0xff; DUMMY_SIGNATURE_LEN].into(),
        };

        match &self.gas_policy_id {
            Some(policy_id) => self.fill_sponsored_gas(&mut op, policy_id).await?,
            None => self.fill_self_funded_gas(&mut op).await?,
        }

        let op_hash = op.hash(self.entry_point, self.chain_id);
        let signature = self.wallet.sign_hash(op_hash).await?;
        op.signature = signature.as_bytes().to_vec().into();

        tracing::info!("Sending user operation to bundler");
        let submitted: B256 = self
            .rpc("eth_sendUserOperation", async {
                self.provider
                    .client()
                    .request("eth_sendUserOperation", (op.clone(), self.entry_point))
                    .await
            })
            .await?;

        Ok(UserOperationHash(submitted))
    }

    /// Block until the bundler reports the operation mined, returning
    /// the including transaction's hash.
    ///
    /// Polls `eth_getUserOperationReceipt` until it turns up or
    /// `wait_secs` elapses.
    pub async fn wait_for_transaction(
        &self,
        uo_hash: UserOperationHash,
        wait_secs: u64,
    ) -> BundlerResult<TxHash> {
        let poll = Duration::from_secs(CONFIRMATION_POLL_SECS);

        let result = timeout(Duration::from_secs(wait_secs), async {
            let mut ticker = interval(poll);
            loop {
                ticker.tick().await;

                let receipt: Option<UserOperationReceipt> = self
                    .rpc("eth_getUserOperationReceipt", async {
                        self.provider
                            .client()
                            .request("eth_getUserOperationReceipt", (uo_hash,))
                            .await
                    })
                    .await?;

                match receipt {
                    Some(r) if r.success => return Ok(r.receipt.transaction_hash),
                    Some(r) => {
                        return Err(BundlerError::Reverted(format!(
                            "included in {} but execution failed",
                            r.receipt.transaction_hash
                        )))
                    }
                    None => {
                        tracing::debug!(user_op_hash = %uo_hash, "User operation pending");
                    }
                }
            }
        })
        .await;

        match result {
            Ok(tx_hash) => tx_hash,
            Err(_) => Err(BundlerError::ConfirmationTimeout(wait_secs)),
        }
    }

    /// Logs emitted by the transaction that included the operation.
    pub async fn transaction_logs(&self, tx_hash: TxHash) -> BundlerResult<Vec<Log>> {
        let receipt = self
            .rpc("eth_getTransactionReceipt", async {
                self.provider.get_transaction_receipt(tx_hash).await
            })
            .await?
            .ok_or(BundlerError::TransactionNotFound(tx_hash))?;
        Ok(receipt.inner.logs().to_vec())
    }

    /// The address that signed (and paid gas for) a transaction.
    pub async fn transaction_sender(&self, tx_hash: TxHash) -> BundlerResult<Address> {
        let tx = self
            .rpc("eth_getTransactionByHash", async {
                self.provider.get_transaction_by_hash(tx_hash).await
            })
            .await?
            .ok_or(BundlerError::TransactionNotFound(tx_hash))?;
        Ok(tx.from())
    }

    /// Read the sender's operation nonce from the entry point.
    async fn entry_point_nonce(&self, sender: Address) -> BundlerResult<U256> {
        let call = IEntryPoint::getNonceCall {
            sender,
            key: alloy::primitives::aliases::U192::ZERO,
        };
        let tx = TransactionRequest::default()
            .with_to(self.entry_point)
            .with_input(Bytes::from(call.abi_encode()));

        let returned = self
            .rpc("eth_call(getNonce)", async { self.provider.call(tx).await })
            .await?;

        IEntryPoint::getNonceCall::abi_decode_returns(&returned)
            .map_err(|e| BundlerError::Rpc(format!("getNonce returned malformed data: {}", e)))
    }

    /// Fill gas fields from plain estimation; the EOA pays.
    async fn fill_self_funded_gas(&self, op: &mut UserOperationV07) -> BundlerResult<()> {
        let estimate: GasEstimate = self
            .rpc("eth_estimateUserOperationGas", async {
                self.provider
                    .client()
                    .request(
                        "eth_estimateUserOperationGas",
                        (op.clone(), self.entry_point),
                    )
                    .await
            })
            .await?;

        let gas_price = self
            .rpc("eth_gasPrice", async { self.provider.get_gas_price().await })
            .await?;
        let priority = self
            .rpc("eth_maxPriorityFeePerGas", async {
                self.provider.get_max_priority_fee_per_gas().await
            })
            .await?;

        op.call_gas_limit = estimate.call_gas_limit;
        op.verification_gas_limit = estimate.verification_gas_limit;
        op.pre_verification_gas = estimate.pre_verification_gas;
        // Half again over the quoted price so a fee bump between
        // estimation and inclusion doesn't strand the operation.
        op.max_fee_per_gas = U256::from(gas_price + gas_price / 2);
        op.max_priority_fee_per_gas = U256::from(priority);
        Ok(())
    }

    /// Fill gas and paymaster fields through the sponsorship policy.
    async fn fill_sponsored_gas(
        &self,
        op: &mut UserOperationV07,
        policy_id: &str,
    ) -> BundlerResult<()> {
        tracing::info!(policy_id = policy_id, "Requesting gas sponsorship");

        let params = json!({
            "policyId": policy_id,
            "entryPoint": self.entry_point,
            "dummySignature": op.signature,
            "userOperation": op,
        });

        let sponsored: GasAndPaymaster = self
            .rpc("alchemy_requestGasAndPaymasterAndData", async {
                self.provider
                    .client()
                    .request("alchemy_requestGasAndPaymasterAndData", (params,))
                    .await
            })
            .await
            .map_err(|e| match e {
                BundlerError::Rpc(msg) => BundlerError::Paymaster(msg),
                other => other,
            })?;

        op.call_gas_limit = sponsored.call_gas_limit;
        op.verification_gas_limit = sponsored.verification_gas_limit;
        op.pre_verification_gas = sponsored.pre_verification_gas;
        op.max_fee_per_gas = sponsored.max_fee_per_gas;
        op.max_priority_fee_per_gas = sponsored.max_priority_fee_per_gas;
        op.paymaster = Some(sponsored.paymaster);
        op.paymaster_data = Some(sponsored.paymaster_data);
        op.paymaster_verification_gas_limit = Some(sponsored.paymaster_verification_gas_limit);
        op.paymaster_post_op_gas_limit = Some(sponsored.paymaster_post_op_gas_limit);
        Ok(())
    }

    /// Wrap an RPC future with the per-request timeout and map failures
    /// into [`BundlerError`].
    async fn rpc<T>(
        &self,
        what: &'static str,
        fut: impl Future<Output = TransportResult<T>>,
    ) -> BundlerResult<T> {
        match timeout(self.rpc_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(BundlerError::Rpc(format!("{}: {}", what, e))),
            Err(_) => Err(BundlerError::Rpc(format!("{}: request timed out", what))),
        }
    }
}

impl std::fmt::Debug for BundlerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundlerClient")
            .field("sender", &self.wallet.address())
            .field("entry_point", &self.entry_point)
            .field("delegate", &self.delegate)
            .field("chain_id", &self.chain_id)
            .field("sponsored", &self.gas_policy_id.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::types::ChainId;
    use crate::config::schema::{UpgraderConfig, SEPOLIA_CHAIN_ID};

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_config() -> UpgraderConfig {
        UpgraderConfig {
            api_key: "test-key".to_string(),
            chain: ChainId(SEPOLIA_CHAIN_ID),
            target_address: Address::ZERO,
            value: U256::ZERO,
            call_data: Bytes::new(),
            gas_policy_id: None,
            timeout_secs: 60,
            verify_sponsorship: false,
            decode_event: false,
        }
    }

    #[test]
    fn test_client_creation_is_offline() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, SEPOLIA_CHAIN_ID).unwrap();
        let client = BundlerClient::new(&test_config(), wallet).unwrap();
        assert_eq!(
            client.sender().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, SEPOLIA_CHAIN_ID).unwrap();
        let client = BundlerClient::new(&test_config(), wallet).unwrap();
        let printed = format!("{:?}", client);
        assert!(!printed.contains("test-key"));
    }

    #[test]
    fn test_execute_call_encoding_has_selector() {
        let encoded = IModularAccount::executeCall {
            target: Address::ZERO,
            value: U256::ZERO,
            data: Bytes::new(),
        }
        .abi_encode();
        assert_eq!(&encoded[..4], IModularAccount::executeCall::SELECTOR);
        // selector + 3 head words + empty bytes tail (offset word only)
        assert!(encoded.len() >= 4 + 32 * 4);
    }
}
