//! In-memory providers for unit tests.

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use async_trait::async_trait;
use starknet_types_core::felt::Felt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{EthProofResponse, L1Provider, L2Provider, StorageProofEntry};
use crate::errors::{CoreError, Result};

/// L1 node backed by maps. Unknown slots answer with an empty proof of value 0.
#[derive(Default)]
pub(crate) struct MockL1 {
    proofs: HashMap<(Address, B256, u64), EthProofResponse>,
    calls: HashMap<(Address, Bytes, u64), Bytes>,
    failing: bool,
    pub(crate) proof_requests: AtomicUsize,
}

impl MockL1 {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    /// Register a single-slot proof of `value` with the given proof nodes.
    pub(crate) fn with_storage_proof(
        mut self,
        address: Address,
        key: B256,
        block: u64,
        value: U256,
        nodes: Vec<Bytes>,
    ) -> Self {
        let mut response = empty_proof(address, key);
        response.account_proof = vec![Bytes::from_static(&[0xf8, 0x51, 0x80])];
        response.storage_proof[0].value = value;
        response.storage_proof[0].proof = nodes;
        self.proofs.insert((address, key, block), response);
        self
    }

    /// Register a raw `eth_getProof` answer.
    pub(crate) fn with_proof_response(
        mut self,
        address: Address,
        key: B256,
        block: u64,
        response: EthProofResponse,
    ) -> Self {
        self.proofs.insert((address, key, block), response);
        self
    }

    pub(crate) fn with_call(mut self, to: Address, data: Bytes, block: u64, result: Bytes) -> Self {
        self.calls.insert((to, data, block), result);
        self
    }
}

fn empty_proof(address: Address, key: B256) -> EthProofResponse {
    EthProofResponse {
        address,
        account_proof: vec![],
        balance: U256::ZERO,
        code_hash: B256::ZERO,
        nonce: U64::ZERO,
        storage_hash: B256::repeat_byte(0x56),
        storage_proof: vec![StorageProofEntry {
            key: U256::from_be_bytes(key.0),
            value: U256::ZERO,
            proof: vec![],
        }],
    }
}

#[async_trait]
impl L1Provider for MockL1 {
    async fn get_proof(
        &self,
        address: Address,
        keys: Vec<B256>,
        block: u64,
    ) -> Result<EthProofResponse> {
        self.proof_requests.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(CoreError::transport("l1", "connection refused"));
        }
        let key = keys.first().copied().unwrap_or_default();
        Ok(self
            .proofs
            .get(&(address, key, block))
            .cloned()
            .unwrap_or_else(|| empty_proof(address, key)))
    }

    async fn call(&self, to: Address, data: Bytes, block: u64) -> Result<Bytes> {
        if self.failing {
            return Err(CoreError::transport("l1", "connection refused"));
        }
        Ok(self
            .calls
            .get(&(to, data, block))
            .cloned()
            .unwrap_or_else(|| Bytes::from(vec![0u8; 32])))
    }

    async fn block_number(&self) -> Result<u64> {
        if self.failing {
            return Err(CoreError::transport("l1", "connection refused"));
        }
        Ok(0)
    }
}

/// Starknet node backed by maps. Unset storage reads as zero, like the real chain.
#[derive(Default)]
pub(crate) struct MockL2 {
    storage: HashMap<(Felt, Felt), Felt>,
    calls: HashMap<(Felt, Felt, Vec<Felt>), Vec<Felt>>,
    failing: bool,
    pub(crate) call_count: AtomicUsize,
}

impl MockL2 {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub(crate) fn with_storage(mut self, contract: Felt, key: Felt, value: Felt) -> Self {
        self.storage.insert((contract, key), value);
        self
    }

    pub(crate) fn with_call(
        mut self,
        contract: Felt,
        selector: Felt,
        calldata: Vec<Felt>,
        result: Vec<Felt>,
    ) -> Self {
        self.calls.insert((contract, selector, calldata), result);
        self
    }
}

#[async_trait]
impl L2Provider for MockL2 {
    async fn get_storage_at(&self, contract: Felt, key: Felt) -> Result<Felt> {
        if self.failing {
            return Err(CoreError::transport("l2", "503 service unavailable"));
        }
        Ok(self.storage.get(&(contract, key)).copied().unwrap_or(Felt::ZERO))
    }

    async fn call_contract(
        &self,
        contract: Felt,
        selector: Felt,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(CoreError::transport("l2", "503 service unavailable"));
        }
        self.calls
            .get(&(contract, selector, calldata))
            .cloned()
            .ok_or_else(|| CoreError::transport("l2", "contract call reverted"))
    }
}
