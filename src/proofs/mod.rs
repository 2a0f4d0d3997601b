//! Single-slot storage proofs.
//!
//! A balance-of strategy proves one L1 storage slot to the L2 verifier. The
//! flow per voter is:
//!
//! ```text
//!   slot key  = keccak(pad32(account) ‖ pad32(base_slot))     (slots.rs)
//!   response  = eth_getProof(token, [slot key], block)        (one round-trip)
//!   ProofInputs::to_user_params()  → felts for the L2 call
//! ```
//!
//! Proofs are block-scoped and never cached. A slot that was never written is
//! still a valid proof of value zero.

pub mod ints;
pub mod slots;

pub use ints::IntsSequence;
pub use slots::{balance_of_slot_key, erc1155_balance_slot_key, pad_address, uint_mapping_slot};

use alloy_primitives::{Address, B256, U256};
use serde::Serialize;
use starknet_types_core::felt::Felt;
use std::sync::Arc;
use tracing::debug;

use crate::codec::Uint256Split;
use crate::errors::{CoreError, Result};
use crate::rpc::{EthProofResponse, L1Provider};

/// An `eth_getProof` answer repackaged for the L2 verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofInputs {
    /// L1 block the proof is anchored to
    pub block_number: u64,
    /// Contract whose storage is proven
    pub account: Address,
    /// Storage trie root of `account` at `block_number`
    pub storage_root: Uint256Split,
    /// Account proof nodes, state root to account leaf
    pub account_proof: Vec<IntsSequence>,
    /// Proven slot
    pub storage_key: B256,
    /// Value held in the slot (zero for unwritten slots)
    pub storage_value: U256,
    /// Storage proof nodes, storage root to slot leaf
    pub storage_proof: Vec<IntsSequence>,
}

impl ProofInputs {
    /// Repackage a raw response, checking it proves exactly the requested slot.
    pub fn from_response(
        response: EthProofResponse,
        account: Address,
        slot_key: B256,
        block_number: u64,
    ) -> Result<Self> {
        if response.address != account {
            return Err(CoreError::MalformedResponse(format!(
                "proof for {} while {account} was requested",
                response.address
            )));
        }
        let [entry] = <[_; 1]>::try_from(response.storage_proof).map_err(|entries: Vec<_>| {
            CoreError::MalformedResponse(format!(
                "expected one storage proof, got {}",
                entries.len()
            ))
        })?;
        if entry.key != U256::from_be_bytes(slot_key.0) {
            return Err(CoreError::MalformedResponse(format!(
                "storage proof for key {:#x}, requested {slot_key}",
                entry.key
            )));
        }

        Ok(Self {
            block_number,
            account,
            storage_root: Uint256Split::from_u256(U256::from_be_bytes(response.storage_hash.0)),
            account_proof: response
                .account_proof
                .iter()
                .map(|node| IntsSequence::from_bytes(node))
                .collect(),
            storage_key: slot_key,
            storage_value: entry.value,
            storage_proof: entry.proof.iter().map(|node| IntsSequence::from_bytes(node)).collect(),
        })
    }

    /// Whether the slot holds zero at this block.
    pub fn is_empty_slot(&self) -> bool {
        self.storage_value.is_zero()
    }

    /// Flatten the storage proof into the per-voter felts.
    ///
    /// Layout: `[key.low, key.high, n, bytes_len[0..n], word_count[0..n], words...]`.
    pub fn to_user_params(&self) -> Vec<Felt> {
        let key = Uint256Split::from_u256(U256::from_be_bytes(self.storage_key.0));
        let n = self.storage_proof.len();
        let words: usize = self.storage_proof.iter().map(|node| node.values.len()).sum();

        let mut params = Vec::with_capacity(3 + 2 * n + words);
        params.extend(key.to_felts());
        params.push(Felt::from(n as u64));
        params.extend(self.storage_proof.iter().map(|node| Felt::from(node.bytes_len as u64)));
        params.extend(self.storage_proof.iter().map(|node| Felt::from(node.values.len() as u64)));
        params.extend(
            self.storage_proof.iter().flat_map(|node| node.values.iter().map(|w| Felt::from(*w))),
        );
        params
    }
}

/// Fetches single-slot proofs from an L1 node.
#[derive(Clone)]
pub struct StorageProofFetcher {
    l1: Arc<dyn L1Provider>,
}

impl StorageProofFetcher {
    pub fn new(l1: Arc<dyn L1Provider>) -> Self {
        Self { l1 }
    }

    /// Prove `slot_key` of `contract` at `block_number`.
    ///
    /// One `eth_getProof` round-trip; transport errors are returned as-is for
    /// the caller to retry.
    pub async fn fetch_proof(
        &self,
        contract: Address,
        slot_key: B256,
        block_number: u64,
    ) -> Result<ProofInputs> {
        let response = self.l1.get_proof(contract, vec![slot_key], block_number).await?;
        let inputs = ProofInputs::from_response(response, contract, slot_key, block_number)?;
        debug!(
            target: "prophouse::proofs",
            %contract,
            %slot_key,
            block_number,
            nodes = inputs.storage_proof.len(),
            empty = inputs.is_empty_slot(),
            "fetched storage proof"
        );
        Ok(inputs)
    }
}
