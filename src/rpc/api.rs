use alloy_eips::BlockNumberOrTag;
use alloy_primitives::{Address, Bytes, B256, U64};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use starknet_types_core::felt::Felt;

use super::types::{CallRequest, EthProofResponse, FunctionCall, StarknetBlockId};

/// The subset of the `eth_*` namespace used for proofs and balance reads.
#[rpc(client, namespace = "eth")]
pub trait EthApi {
    /// EIP-1186 account and storage proof.
    #[method(name = "getProof")]
    async fn get_proof(
        &self,
        address: Address,
        keys: Vec<B256>,
        block: BlockNumberOrTag,
    ) -> RpcResult<EthProofResponse>;

    /// Read-only contract call.
    #[method(name = "call")]
    async fn call(&self, request: CallRequest, block: BlockNumberOrTag) -> RpcResult<Bytes>;

    /// Newest block number.
    #[method(name = "blockNumber")]
    async fn block_number(&self) -> RpcResult<U64>;
}

/// The subset of the `starknet_*` namespace used for registry reads.
#[rpc(client, namespace = "starknet")]
pub trait StarknetApi {
    /// Raw storage read.
    #[method(name = "getStorageAt")]
    async fn get_storage_at(
        &self,
        contract_address: Felt,
        key: Felt,
        block_id: StarknetBlockId,
    ) -> RpcResult<Felt>;

    /// View call into a contract.
    #[method(name = "call")]
    async fn call_contract(
        &self,
        request: FunctionCall,
        block_id: StarknetBlockId,
    ) -> RpcResult<Vec<Felt>>;
}
