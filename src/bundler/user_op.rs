//! ERC-4337 v0.7 user operation wire format and hashing.

use alloy::eips::eip7702::SignedAuthorization;
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// User operation as submitted to the bundler (EIP-4337 v0.7, unpacked
/// JSON form).
///
/// Factory fields are absent here: with EIP-7702 the account is the EOA
/// itself and no counterfactual deployment takes place. The signed
/// authorization rides along in the `eip7702Auth` extension field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationV07 {
    pub sender: Address,
    pub nonce: U256,
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymaster_verification_gas_limit: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymaster_post_op_gas_limit: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymaster_data: Option<Bytes>,
    #[serde(rename = "eip7702Auth", skip_serializing_if = "Option::is_none")]
    pub eip7702_auth: Option<SignedAuthorization>,
    pub signature: Bytes,
}

impl UserOperationV07 {
    /// Concatenated `paymaster ++ verificationGasLimit(16) ++
    /// postOpGasLimit(16) ++ paymasterData`, or empty when unsponsored.
    fn paymaster_and_data(&self) -> Bytes {
        let Some(paymaster) = self.paymaster else {
            return Bytes::new();
        };
        let mut out = Vec::with_capacity(52);
        out.extend_from_slice(paymaster.as_slice());
        out.extend_from_slice(
            &self
                .paymaster_verification_gas_limit
                .unwrap_or(U256::ZERO)
                .to_be_bytes::<32>()[16..],
        );
        out.extend_from_slice(
            &self
                .paymaster_post_op_gas_limit
                .unwrap_or(U256::ZERO)
                .to_be_bytes::<32>()[16..],
        );
        if let Some(data) = &self.paymaster_data {
            out.extend_from_slice(data);
        }
        out.into()
    }

    /// Pack two 128-bit quantities into one bytes32, high half first.
    fn pack_pair(high: U256, low: U256) -> B256 {
        let mut out = [0u8; 32];
        out[..16].copy_from_slice(&high.to_be_bytes::<32>()[16..]);
        out[16..].copy_from_slice(&low.to_be_bytes::<32>()[16..]);
        B256::from(out)
    }

    /// Compute the v0.7 user-operation hash this operation is signed
    /// over: `keccak(abi.encode(keccak(packed fields), entryPoint,
    /// chainId))`.
    pub fn hash(&self, entry_point: Address, chain_id: u64) -> B256 {
        // initCode is always empty for an EIP-7702 account.
        let packed = (
            self.sender,
            self.nonce,
            keccak256([0u8; 0]),
            keccak256(&self.call_data),
            Self::pack_pair(self.verification_gas_limit, self.call_gas_limit),
            self.pre_verification_gas,
            Self::pack_pair(self.max_priority_fee_per_gas, self.max_fee_per_gas),
            keccak256(self.paymaster_and_data()),
        )
            .abi_encode();

        keccak256((keccak256(packed), entry_point, U256::from(chain_id)).abi_encode())
    }
}
