//! L1 and L2 node access.
//!
//! Handlers only see the [`L1Provider`] and [`L2Provider`] traits. The JSON-RPC
//! implementations wrap any jsonrpsee client; tests plug in-memory mocks into
//! the same seam.
//!
//! No call here retries. Transport failures come back as
//! [`CoreError::Transport`] and the caller owns the retry policy.

pub mod api;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use api::{EthApiClient, StarknetApiClient};
pub use types::{
    CallRequest, EthProofResponse, FunctionCall, StarknetBlockId, StarknetBlockTag,
    StorageProofEntry,
};

use alloy_eips::BlockNumberOrTag;
use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::HttpClientBuilder;
use starknet_types_core::felt::Felt;
use std::sync::Arc;
use tracing::debug;

use crate::errors::{CoreError, Result};

/// Ethereum L1 node.
#[async_trait]
pub trait L1Provider: Send + Sync {
    /// `eth_getProof` for `keys` of `address` at `block`.
    async fn get_proof(
        &self,
        address: Address,
        keys: Vec<B256>,
        block: u64,
    ) -> Result<EthProofResponse>;

    /// `eth_call` against `to` at `block`.
    async fn call(&self, to: Address, data: Bytes, block: u64) -> Result<Bytes>;

    /// Newest block number.
    async fn block_number(&self) -> Result<u64>;
}

/// Starknet L2 node.
#[async_trait]
pub trait L2Provider: Send + Sync {
    /// Storage value at `key` of `contract` on the latest block.
    async fn get_storage_at(&self, contract: Felt, key: Felt) -> Result<Felt>;

    /// View call on the latest block.
    async fn call_contract(
        &self,
        contract: Felt,
        selector: Felt,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>>;
}

/// [`L1Provider`] over a jsonrpsee client.
#[derive(Debug, Clone)]
pub struct RpcL1Provider<C> {
    client: C,
}

impl<C> RpcL1Provider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C> L1Provider for RpcL1Provider<C>
where
    C: ClientT + Send + Sync,
{
    async fn get_proof(
        &self,
        address: Address,
        keys: Vec<B256>,
        block: u64,
    ) -> Result<EthProofResponse> {
        debug!(target: "prophouse::rpc", %address, keys = keys.len(), block, "eth_getProof");
        EthApiClient::get_proof(&self.client, address, keys, BlockNumberOrTag::Number(block))
            .await
            .map_err(|e| CoreError::transport("l1", e))
    }

    async fn call(&self, to: Address, data: Bytes, block: u64) -> Result<Bytes> {
        debug!(target: "prophouse::rpc", %to, block, "eth_call");
        let request = CallRequest { to, data };
        EthApiClient::call(&self.client, request, BlockNumberOrTag::Number(block))
            .await
            .map_err(|e| CoreError::transport("l1", e))
    }

    async fn block_number(&self) -> Result<u64> {
        EthApiClient::block_number(&self.client)
            .await
            .map(|n| n.to::<u64>())
            .map_err(|e| CoreError::transport("l1", e))
    }
}

/// [`L2Provider`] over a jsonrpsee client.
#[derive(Debug, Clone)]
pub struct RpcL2Provider<C> {
    client: C,
    block_id: StarknetBlockId,
}

impl<C> RpcL2Provider<C> {
    /// Reads against the latest accepted block.
    pub fn new(client: C) -> Self {
        Self { client, block_id: StarknetBlockId::Tag(StarknetBlockTag::Latest) }
    }
}

#[async_trait]
impl<C> L2Provider for RpcL2Provider<C>
where
    C: ClientT + Send + Sync,
{
    async fn get_storage_at(&self, contract: Felt, key: Felt) -> Result<Felt> {
        debug!(target: "prophouse::rpc", "starknet_getStorageAt {contract:#x} key {key:#x}");
        StarknetApiClient::get_storage_at(&self.client, contract, key, self.block_id)
            .await
            .map_err(|e| CoreError::transport("l2", e))
    }

    async fn call_contract(
        &self,
        contract: Felt,
        selector: Felt,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>> {
        debug!(target: "prophouse::rpc", args = calldata.len(), "starknet_call {contract:#x}");
        let request =
            FunctionCall { contract_address: contract, entry_point_selector: selector, calldata };
        StarknetApiClient::call_contract(&self.client, request, self.block_id)
            .await
            .map_err(|e| CoreError::transport("l2", e))
    }
}

/// Connect an HTTP JSON-RPC L1 provider.
pub fn http_l1_provider(url: &str) -> Result<Arc<dyn L1Provider>> {
    let client =
        HttpClientBuilder::default().build(url).map_err(|e| CoreError::transport("l1", e))?;
    Ok(Arc::new(RpcL1Provider::new(client)))
}

/// Connect an HTTP JSON-RPC Starknet provider.
pub fn http_l2_provider(url: &str) -> Result<Arc<dyn L2Provider>> {
    let client =
        HttpClientBuilder::default().build(url).map_err(|e| CoreError::transport("l2", e))?;
    Ok(Arc::new(RpcL2Provider::new(client)))
}
