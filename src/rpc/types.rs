use alloy_primitives::{Address, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// Response of `eth_getProof` (EIP-1186)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthProofResponse {
    pub address: Address,
    pub account_proof: Vec<Bytes>,
    pub balance: U256,
    pub code_hash: B256,
    pub nonce: U64,
    pub storage_hash: B256,
    pub storage_proof: Vec<StorageProofEntry>,
}

/// One storage slot inside an `eth_getProof` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProofEntry {
    /// Slot key. Some nodes return it unpadded, so it is read as a number.
    pub key: U256,
    pub value: U256,
    pub proof: Vec<Bytes>,
}

/// Request body for `eth_call`
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub to: Address,
    pub data: Bytes,
}

/// Request body for `starknet_call`
#[derive(Debug, Clone, Serialize)]
pub struct FunctionCall {
    pub contract_address: Felt,
    pub entry_point_selector: Felt,
    pub calldata: Vec<Felt>,
}

/// Named Starknet block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StarknetBlockTag {
    Latest,
}

/// Starknet `block_id` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StarknetBlockId {
    Tag(StarknetBlockTag),
    Number { block_number: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_serialization() {
        let latest = serde_json::to_value(StarknetBlockId::Tag(StarknetBlockTag::Latest)).unwrap();
        assert_eq!(latest, serde_json::json!("latest"));
        let number = serde_json::to_value(StarknetBlockId::Number { block_number: 7 }).unwrap();
        assert_eq!(number, serde_json::json!({ "block_number": 7 }));
    }

    #[test]
    fn test_proof_response_deserializes_geth_shape() {
        let json = serde_json::json!({
            "address": "0x00000000000000000000000000000000000000aa",
            "accountProof": ["0xf851", "0xe210"],
            "balance": "0x0",
            "codeHash": "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            "nonce": "0x1",
            "storageHash": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
            "storageProof": [{ "key": "0x5", "value": "0x0", "proof": [] }]
        });
        let response: EthProofResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.account_proof.len(), 2);
        assert_eq!(response.storage_proof[0].key, U256::from(5));
        assert!(response.storage_proof[0].proof.is_empty());
    }
}
